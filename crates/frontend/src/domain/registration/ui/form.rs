use contracts::domain::approvals::ApplicantKind;
use contracts::domain::registration::{
    org_types, Availability, AvailabilityField, RegistrationForm, DOCUMENT_FIELDS,
};
use contracts::shared::api_error::ApiError;
use contracts::shared::submission::SubmissionReceipt;
use leptos::html;
use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::File;

use super::availability::AvailabilityCheck;
use super::success::RegistrationSuccess;
use crate::domain::registration::api;
use crate::layout::global_context::{use_global_context, Page};
use crate::shared::api_utils::use_api;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_FORM;

const NETWORK_ERROR: &str = "Network error. Please check your connection and try again.";

/// Unsubmitted form contents per flow, kept while the user is elsewhere.
#[derive(Clone, Copy)]
pub struct RegistrationDrafts(RwSignal<HashMap<ApplicantKind, RegistrationForm>>);

impl RegistrationDrafts {
    fn get(&self, kind: ApplicantKind) -> RegistrationForm {
        self.0
            .with_untracked(|d| d.get(&kind).cloned().unwrap_or_default())
    }

    fn store(&self, kind: ApplicantKind, form: RegistrationForm) {
        self.0.update(|d| {
            d.insert(kind, form);
        });
    }

    fn discard(&self, kind: ApplicantKind) {
        self.0.update(|d| {
            d.remove(&kind);
        });
    }
}

pub fn provide_registration_drafts() {
    provide_context(RegistrationDrafts(RwSignal::new(HashMap::new())));
}

type DocumentRefs = [NodeRef<html::Input>; 3];

fn selected_files(refs: &DocumentRefs) -> Vec<(&'static str, File)> {
    DOCUMENT_FIELDS
        .iter()
        .zip(refs.iter())
        .filter_map(|((key, _), node)| {
            let file = node.get_untracked()?.files()?.get(0)?;
            Some((*key, file))
        })
        .collect()
}

#[component]
pub fn RegistrationPage(kind: ApplicantKind) -> impl IntoView {
    let ctx = use_global_context();
    let api_client = use_api();
    let drafts =
        use_context::<RegistrationDrafts>().expect("RegistrationDrafts not found in context");

    let form = RwSignal::new(drafts.get(kind));
    let email_check = AvailabilityCheck::new(api_client.clone(), kind, AvailabilityField::Email);
    let username_check =
        AvailabilityCheck::new(api_client.clone(), kind, AvailabilityField::Username);
    let api_client = StoredValue::new(api_client);
    let error = RwSignal::new(None::<String>);
    let submitting = RwSignal::new(false);
    let receipt = RwSignal::new(None::<SubmissionReceipt>);
    let documents: DocumentRefs = [NodeRef::new(), NodeRef::new(), NodeRef::new()];

    // leaving the page without submitting keeps what was typed
    Effect::new(move |_| drafts.store(kind, form.get()));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        error.set(None);

        let current = form.get_untracked();
        if let Err(e) = current.validate(kind) {
            error.set(Some(e.to_string()));
            return;
        }
        for check in [email_check, username_check] {
            if check.state.get_untracked() == Availability::Taken {
                error.set(Some(check.message().to_string()));
                return;
            }
        }

        let files = selected_files(&documents);
        submitting.set(true);
        let client = api_client.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            match api::register(&client, kind, &current, files).await {
                Ok(r) => {
                    log::info!("{} registered: {} ({})", kind.slug(), r.id, r.username);
                    receipt.set(Some(r));
                }
                Err(ApiError::Network(e)) => {
                    log::error!("registration request failed: {}", e);
                    error.set(Some(NETWORK_ERROR.to_string()));
                }
                Err(e) => {
                    log::warn!("registration rejected: {}", e);
                    error.set(Some(e.to_string()));
                }
            }
            submitting.set(false);
        });
    };

    let on_success_closed = Callback::new(move |_: ()| {
        receipt.set(None);
        drafts.discard(kind);
        form.set(RegistrationForm::default());
        email_check.reset();
        username_check.reset();
        ctx.navigate(Page::Login);
    });

    let text_input = move |label: &'static str,
                           input_type: &'static str,
                           get: fn(&RegistrationForm) -> String,
                           set: fn(&mut RegistrationForm, String)| {
        view! {
            <div class="form-group">
                <label>{label}</label>
                <input
                    type=input_type
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </div>
        }
    };

    view! {
        <PageFrame page_id="registration--form" category=PAGE_CAT_FORM>
            {move || match receipt.get() {
                Some(r) => view! {
                    <RegistrationSuccess receipt=r on_close=on_success_closed />
                }
                .into_any(),
                None => view! {
                    <div class="page__header">
                        <h1 class="page__title">{format!("{} Registration", kind.display_name())}</h1>
                    </div>
                    <form class="registration-form" on:submit=on_submit>
                        {move || error.get().map(|e| view! {
                            <div class="alert alert--error" role="alert">
                                <strong>"Error: "</strong>{e}
                            </div>
                        })}

                        <fieldset>
                            <legend>"Organisation"</legend>
                            {text_input("Organisation Name *", "text", |f| f.org_name.clone(), |f, v| f.org_name = v)}
                            <div class="form-group">
                                <label>"Organisation Type"</label>
                                <select
                                    prop:value=move || form.with(|f| f.org_type.clone())
                                    on:change=move |ev| form.update(|f| f.org_type = event_target_value(&ev))
                                >
                                    <option value="">"Select type"</option>
                                    {org_types(kind)
                                        .iter()
                                        .map(|t| view! { <option value=*t>{*t}</option> })
                                        .collect_view()}
                                </select>
                            </div>
                            <div class="form-group">
                                <label>"Email *"</label>
                                <input
                                    type="email"
                                    prop:value=move || form.with(|f| f.email.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        email_check.on_input(&value);
                                        form.update(|f| f.email = value);
                                    }
                                />
                                <div class=move || email_check.state.get().css_class()>
                                    {move || email_check.message()}
                                </div>
                            </div>
                            {text_input("Mobile *", "tel", |f| f.mobile.clone(), |f, v| f.mobile = v)}
                            {(kind == ApplicantKind::Buyer).then(|| {
                                text_input("Phone", "tel", |f| f.phone.clone(), |f, v| f.phone = v)
                            })}
                            <div class="form-group">
                                <label>"Address"</label>
                                <textarea
                                    rows="3"
                                    prop:value=move || form.with(|f| f.address.clone())
                                    on:input=move |ev| form.update(|f| f.address = event_target_value(&ev))
                                ></textarea>
                            </div>
                        </fieldset>

                        <fieldset>
                            <legend>"Single Point of Contact"</legend>
                            {text_input("SPOC Name", "text", |f| f.spoc_name.clone(), |f, v| f.spoc_name = v)}
                            {text_input("SPOC Mobile *", "tel", |f| f.spoc_mobile.clone(), |f, v| f.spoc_mobile = v)}
                        </fieldset>

                        <fieldset>
                            <legend>"Login"</legend>
                            <div class="form-group">
                                <label>"Username *"</label>
                                <input
                                    type="text"
                                    prop:value=move || form.with(|f| f.username.clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        username_check.on_input(&value);
                                        form.update(|f| f.username = value);
                                    }
                                />
                                <div class=move || username_check.state.get().css_class()>
                                    {move || username_check.message()}
                                </div>
                            </div>
                            {text_input("Password *", "password", |f| f.password.clone(), |f, v| f.password = v)}
                        </fieldset>

                        <fieldset>
                            <legend>"Documents"</legend>
                            {DOCUMENT_FIELDS
                                .iter()
                                .zip(documents)
                                .map(|((key, label), node)| view! {
                                    <div class="form-group">
                                        <label>{*label}</label>
                                        <input type="file" name=*key accept=".pdf,.jpg,.jpeg,.png" node_ref=node />
                                    </div>
                                })
                                .collect_view()}
                        </fieldset>

                        <div class="form-actions">
                            <button
                                type="button"
                                class="button button--secondary"
                                on:click=move |_| ctx.navigate(Page::Login)
                            >
                                "Back to Login"
                            </button>
                            <button type="submit" class="button button--primary" disabled=move || submitting.get()>
                                {move || if submitting.get() { "Submitting..." } else { "Submit for Approval" }}
                            </button>
                        </div>
                    </form>
                }
                .into_any(),
            }}
        </PageFrame>
    }
}
