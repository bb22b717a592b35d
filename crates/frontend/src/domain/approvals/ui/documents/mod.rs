use contracts::domain::approvals::{ApprovalRow, DocumentEntry, DocumentFormat};
use leptos::prelude::*;

use crate::shared::icons::icon;

/// Modal listing uploaded and missing documents of an applicant.
#[component]
pub fn DocumentViewer(row: RwSignal<Option<ApprovalRow>>, base_url: String) -> impl IntoView {
    let base_url = StoredValue::new(base_url);

    move || {
        row.get().map(|applicant| {
            let (uploaded, missing) =
                base_url.with_value(|base| applicant.documents().entries(base));
            let title = format!("Documents - {}", applicant.org_name());
            log::debug!(
                "documents of {}: {} uploaded, {} missing",
                applicant.user_id(),
                uploaded.len(),
                missing.len()
            );

            view! {
                <div class="modal-overlay" on:click=move |_| row.set(None)>
                    <div class="modal document-viewer" on:click=|ev| ev.stop_propagation()>
                        <div class="modal__header">
                            <h3 class="modal__title">{title}</h3>
                            <button class="modal__close" on:click=move |_| row.set(None) title="Close">
                                {icon("x")}
                            </button>
                        </div>
                        <div class="modal__body">
                            {if uploaded.is_empty() {
                                view! {
                                    <p class="document-viewer__empty">"No documents uploaded"</p>
                                }
                                .into_any()
                            } else {
                                uploaded.into_iter().map(uploaded_entry).collect_view().into_any()
                            }}
                            {(!missing.is_empty()).then(|| view! {
                                <div class="document-viewer__missing">
                                    <h4>"Not uploaded"</h4>
                                    <ul>
                                        {missing
                                            .into_iter()
                                            .map(|entry| view! { <li>{entry.label}</li> })
                                            .collect_view()}
                                    </ul>
                                </div>
                            })}
                        </div>
                    </div>
                </div>
            }
        })
    }
}

fn uploaded_entry(entry: DocumentEntry) -> impl IntoView {
    let url = entry.url.clone().unwrap_or_default();
    let preview = match entry.format {
        DocumentFormat::Image => {
            view! { <img class="document-viewer__preview" src=url.clone() alt=entry.label /> }
                .into_any()
        }
        DocumentFormat::Pdf => {
            view! { <iframe class="document-viewer__preview" src=url.clone() title=entry.label></iframe> }
                .into_any()
        }
        DocumentFormat::Other => ().into_any(),
    };
    let extension = if entry.extension.is_empty() {
        String::new()
    } else {
        format!(" (.{})", entry.extension)
    };

    view! {
        <div class="document-viewer__entry">
            <div class="document-viewer__entry-header">
                {icon("file")}
                <span class="document-viewer__label">{entry.label}</span>
                <span class="document-viewer__format">
                    {format!("{}{}", entry.format.description(), extension)}
                </span>
                <a class="button button--link" href=url target="_blank" rel="noopener">
                    "Open"
                </a>
            </div>
            {preview}
        </div>
    }
}
