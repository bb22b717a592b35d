use contracts::domain::batches::{format_date, format_quantity, Batch};
use contracts::shared::pagination::{LoadState, PageState, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;

use crate::domain::batches::api;
use crate::layout::global_context::{use_global_context, Page};
use crate::shared::api_utils::{live_client, use_api};
use crate::shared::components::alert::{Alert, AlertBanner};
use crate::shared::components::page_header::PageHeader;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::{report_api_error, use_auth};

/// Batches of the signed-in aggregator as cards, ten per page.
#[component]
pub fn BatchList() -> impl IntoView {
    let ctx = use_global_context();
    let (auth_state, set_auth_state) = use_auth();
    let aggregator_id = auth_state
        .get_untracked()
        .user
        .map(|u| u.user_id)
        .unwrap_or_default();
    let batches = RwSignal::new(PageState::<Batch>::new(DEFAULT_PAGE_SIZE));
    let load = RwSignal::new(LoadState::Loading);
    let alert = RwSignal::new(None::<Alert>);
    let api_client = StoredValue::new(use_api());

    let on_cancel = move |batch: Batch| {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&batch.cancel_prompt()).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let Some(client) = live_client(api_client) else {
            return;
        };
        alert.set(None);
        wasm_bindgen_futures::spawn_local(async move {
            match api::cancel_batch(&client, &batch).await {
                Ok(message) => {
                    log::info!("batch {} cancelled", batch.batch_id);
                    // stays on the current page unless it became empty
                    batches.update(|s| {
                        s.remove_where(|b| b.batch_id == batch.batch_id);
                    });
                    alert.set(Some(Alert::success(message)));
                }
                Err(e) => {
                    log::warn!("cancelling batch {} failed: {}", batch.batch_id, e);
                    alert.set(Some(Alert::error(report_api_error(set_auth_state, &e))));
                }
            }
        });
    };

    let client = api_client.get_value();
    wasm_bindgen_futures::spawn_local(async move {
        match api::fetch_batches(&client, &aggregator_id).await {
            Ok(rows) => {
                log::debug!("{} batches", rows.len());
                batches.update(|s| s.load(rows));
                load.set(LoadState::Loaded);
            }
            Err(e) => {
                log::error!("failed to load batches: {}", e);
                load.set(LoadState::Failed(report_api_error(set_auth_state, &e)));
            }
        }
    });

    let cards = move || match load.get() {
        LoadState::Loading => view! { <p class="page__hint">"Loading batches..."</p> }.into_any(),
        LoadState::Failed(_) => {
            view! { <p class="page__hint page__hint--error">{LoadState::FAILED_MESSAGE}</p> }.into_any()
        }
        LoadState::Loaded if batches.with(PageState::is_empty) => {
            view! { <p class="page__hint">"No batches yet"</p> }.into_any()
        }
        LoadState::Loaded => batches
            .with(|s| s.page_view().rows.to_vec())
            .into_iter()
            .map(|batch| {
                let batch_id = batch.batch_id.clone();
                let to_cancel = batch.clone();
                let variety = batch.crop_variety.clone().unwrap_or_else(|| "-".to_string());
                let expiry = batch
                    .expiry_date
                    .as_ref()
                    .map(format_date)
                    .unwrap_or_else(|| "-".to_string());
                view! {
                    <div class="batch-card">
                        <div class="batch-card__header">
                            <span class="batch-card__id" title=batch.batch_id.clone()>{batch.short_id()}</span>
                            <h3 class="batch-card__title">{batch.title()}</h3>
                        </div>
                        <dl class="batch-card__details">
                            <dt>"Variety"</dt>
                            <dd>{variety}</dd>
                            <dt>"Procured"</dt>
                            <dd>{format_date(&batch.procurement_date)}</dd>
                            <dt>"Expires"</dt>
                            <dd>{expiry}</dd>
                            <dt>"Quantity"</dt>
                            <dd>{format_quantity(batch.total_quantity())}</dd>
                            <dt>"Farmers"</dt>
                            <dd>{batch.farmer_sources.len()}</dd>
                        </dl>
                        <div class="batch-card__actions">
                            <button
                                class="button button--secondary"
                                on:click=move |_| ctx.navigate(Page::Traceability(batch_id.clone()))
                            >
                                "View Traceability"
                            </button>
                            <button
                                class="button button--danger"
                                on:click=move |_| on_cancel(to_cancel.clone())
                            >
                                "Cancel Batch"
                            </button>
                        </div>
                    </div>
                }
            })
            .collect_view()
            .into_any(),
    };

    view! {
        <PageFrame page_id="batches--list" category=PAGE_CAT_LIST>
            <PageHeader title="My Batches" />
            <AlertBanner alert=alert />
            <div class="page__content">
                <div class="batch-grid">{cards}</div>
                <PaginationControls
                    pager=Signal::derive(move || batches.with(PageState::pager))
                    on_page_change=Callback::new(move |page: usize| {
                        batches.update(|s| {
                            s.go_to_page(page);
                        });
                    })
                />
            </div>
        </PageFrame>
    }
}
