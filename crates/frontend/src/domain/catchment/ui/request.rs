use contracts::domain::catchment::{CatchmentField, CatchmentForm, CatchmentReceipt};
use contracts::shared::selector::{FetchTicket, Resolution};
use leptos::prelude::*;

use super::select::ChainSelect;
use crate::domain::catchment::api;
use crate::shared::api_utils::{use_api, ApiClient};
use crate::shared::components::alert::{Alert, AlertBanner};
use crate::shared::components::page_header::PageHeader;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_FORM;
use crate::system::auth::context::{report_api_error, use_auth};

const LOCATION_FIELDS: [CatchmentField; 6] = [
    CatchmentField::District,
    CatchmentField::Mandal,
    CatchmentField::Panchayat,
    CatchmentField::Village,
    CatchmentField::Vo,
    CatchmentField::Shg,
];

const CROP_FIELDS: [CatchmentField; 4] = [
    CatchmentField::Crop,
    CatchmentField::Variety,
    CatchmentField::Season,
    CatchmentField::Period,
];

/// Runs the lookup of `ticket` and hands the result back to the chain.
fn run_ticket(
    client: ApiClient,
    form: RwSignal<CatchmentForm>,
    ticket: FetchTicket<CatchmentField>,
) {
    wasm_bindgen_futures::spawn_local(async move {
        let result = api::load_options(&client, &ticket).await;
        if let Err(e) = &result {
            log::warn!("{:?} lookup failed: {}", ticket.key, e);
        }
        match form.try_update(|f| f.chain.resolve(&ticket, result)) {
            Some(Resolution::Stale) => {
                log::debug!("dropped stale {:?} options for {}", ticket.key, ticket.parent_value)
            }
            Some(Resolution::Applied(state)) => log::debug!("{:?} -> {:?}", ticket.key, state),
            None => {}
        }
    });
}

/// Season and period share one lookup.
fn run_season_tickets(
    client: ApiClient,
    form: RwSignal<CatchmentForm>,
    tickets: Vec<FetchTicket<CatchmentField>>,
) {
    wasm_bindgen_futures::spawn_local(async move {
        let seasons = api::fetch_seasons(&client).await;
        form.update(|f| {
            for ticket in &tickets {
                let options = match (&seasons, ticket.key) {
                    (Ok(s), CatchmentField::Season) => s.season_options(),
                    (Ok(s), _) => s.period_options(),
                    (Err(e), _) => Err(e.clone()),
                };
                f.chain.resolve(ticket, options);
            }
        });
    });
}

fn field_selects(
    fields: &[CatchmentField],
    form: RwSignal<CatchmentForm>,
    show_errors: RwSignal<bool>,
    on_select: Callback<(CatchmentField, String)>,
) -> impl IntoView {
    fields
        .iter()
        .map(|field| {
            view! { <ChainSelect field=*field form=form show_errors=show_errors on_select=on_select /> }
        })
        .collect_view()
}

#[component]
pub fn CatchmentRequestPage() -> impl IntoView {
    let api_client = StoredValue::new(use_api());
    let (_, set_auth_state) = use_auth();
    let form = RwSignal::new(CatchmentForm::new());
    let show_errors = RwSignal::new(false);
    let submitting = RwSignal::new(false);
    let alert = RwSignal::new(None::<Alert>);
    let receipt = RwSignal::new(None::<CatchmentReceipt>);

    // root fields load once
    let roots = form
        .try_update(|f| {
            [
                CatchmentField::District,
                CatchmentField::Crop,
                CatchmentField::Season,
                CatchmentField::Period,
            ]
            .into_iter()
            .filter_map(|key| f.chain.begin_load(key))
            .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let (season_tickets, other_tickets): (Vec<_>, Vec<_>) = roots
        .into_iter()
        .partition(|t| matches!(t.key, CatchmentField::Season | CatchmentField::Period));
    for ticket in other_tickets {
        run_ticket(api_client.get_value(), form, ticket);
    }
    run_season_tickets(api_client.get_value(), form, season_tickets);

    let on_select = Callback::new(move |(field, value): (CatchmentField, String)| {
        let tickets = form
            .try_update(|f| f.chain.select(field, &value))
            .unwrap_or_default();
        for ticket in tickets {
            run_ticket(api_client.get_value(), form, ticket);
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        show_errors.set(true);
        let current = form.get_untracked();
        if let Err(missing) = current.chain.validate() {
            alert.set(Some(Alert::error(missing.to_string())));
            return;
        }

        alert.set(None);
        submitting.set(true);
        let client = api_client.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            match api::submit(&client, &current).await {
                Ok(request_id) => {
                    log::info!("catchment request {} submitted", request_id);
                    receipt.set(Some(CatchmentReceipt::from_form(request_id, &current)));
                    form.update(|f| f.chain.reset_all());
                    show_errors.set(false);
                    alert.set(Some(Alert::success("Catchment area request submitted successfully.")));
                }
                Err(e) => {
                    log::warn!("catchment request rejected: {}", e);
                    let message = report_api_error(set_auth_state, &e);
                    alert.set(Some(Alert::error(message)));
                }
            }
            submitting.set(false);
        });
    };

    view! {
        <PageFrame page_id="catchment--form" category=PAGE_CAT_FORM>
            <PageHeader title="Catchment Area Request" />

            <AlertBanner alert=alert />
            {move || {
                form.with(|f| f.chain.banner().map(str::to_string))
                    .map(|text| view! { <div class="alert alert--error" role="alert">{text}</div> })
            }}

            {move || receipt.get().map(|r| view! {
                <div class="catchment-receipt">
                    <h3>"Request submitted"</h3>
                    <dl>
                        <dt>"Request ID"</dt>
                        <dd>{r.request_id}</dd>
                        <dt>"Location"</dt>
                        <dd>{r.location}</dd>
                        <dt>"Crop"</dt>
                        <dd>{r.crop}</dd>
                        <dt>"Season"</dt>
                        <dd>{r.season}</dd>
                    </dl>
                    <button class="button button--secondary" on:click=move |_| receipt.set(None)>
                        "Dismiss"
                    </button>
                </div>
            })}

            <form class="page__content catchment-form" on:submit=on_submit>
                <fieldset>
                    <legend>"Location"</legend>
                    {field_selects(&LOCATION_FIELDS, form, show_errors, on_select)}
                </fieldset>
                <fieldset>
                    <legend>"Crop & Season"</legend>
                    {field_selects(&CROP_FIELDS, form, show_errors, on_select)}
                </fieldset>
                <div class="form-actions">
                    <button type="submit" class="button button--primary" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Submitting..." } else { "Submit Request" }}
                    </button>
                </div>
            </form>
        </PageFrame>
    }
}
