use contracts::domain::catchment::{cell, CatchmentRecord, DashboardSummary, FarmerRecord};
use contracts::shared::pagination::{LoadState, PageState, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;

use super::api;
use crate::layout::global_context::{use_global_context, Page};
use crate::shared::api_utils::use_api;
use crate::shared::components::page_header::PageHeader;
use crate::shared::components::paged_table::paged_table;
use crate::shared::components::stat_card::StatCard;
use crate::shared::components::status_badge::StatusBadge;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DASHBOARD;
use crate::system::auth::context::{report_api_error, use_auth};

const CATCHMENT_HEADERS: &[&str] = &[
    "Request ID", "District", "Mandal", "Panchayat", "Village", "Crop", "Season", "Status",
];
const FARMER_HEADERS: &[&str] = &[
    "Farmer ID", "Name", "Category", "Mandal", "Village", "Crop", "Acreage", "Status",
];

fn catchment_row(r: CatchmentRecord) -> AnyView {
    let season = match (&r.season, &r.period) {
        (Some(s), Some(p)) => format!("{} {}", s, p),
        (s, p) => cell(&s.clone().or_else(|| p.clone())),
    };
    view! {
        <tr class="table__row">
            <td class="table__cell">{cell(&r.id)}</td>
            <td class="table__cell">{cell(&r.district_name)}</td>
            <td class="table__cell">{cell(&r.mandal_name)}</td>
            <td class="table__cell">{cell(&r.panchayat_name)}</td>
            <td class="table__cell">{cell(&r.village_name)}</td>
            <td class="table__cell">{cell(&r.crop_name)}</td>
            <td class="table__cell">{season}</td>
            <td class="table__cell"><StatusBadge status=r.status /></td>
        </tr>
    }
    .into_any()
}

fn farmer_row(f: FarmerRecord) -> AnyView {
    let acreage = f
        .acreage
        .map(|a| format!("{:.2}", a))
        .unwrap_or_else(|| "-".to_string());
    view! {
        <tr class="table__row">
            <td class="table__cell">{cell(&f.farmer_id)}</td>
            <td class="table__cell">{cell(&f.farmer_name)}</td>
            <td class="table__cell">{cell(&f.farmer_category)}</td>
            <td class="table__cell">{cell(&f.mandal_name)}</td>
            <td class="table__cell">{cell(&f.village_name)}</td>
            <td class="table__cell">{cell(&f.crop_name)}</td>
            <td class="table__cell">{acreage}</td>
            <td class="table__cell"><StatusBadge status=f.status /></td>
        </tr>
    }
    .into_any()
}

/// Aggregator landing page.
#[component]
pub fn AggregatorDashboard() -> impl IntoView {
    let ctx = use_global_context();
    let api_client = use_api();
    let (auth_state, set_auth_state) = use_auth();
    let user = auth_state.get_untracked().user;
    let aggregator_id = user.as_ref().map(|u| u.user_id.clone()).unwrap_or_default();
    let org_name = user.as_ref().map(|u| u.display_name().to_string());

    let summary = RwSignal::new(None::<DashboardSummary>);
    let catchments = RwSignal::new(PageState::<CatchmentRecord>::new(DEFAULT_PAGE_SIZE));
    let catchments_load = RwSignal::new(LoadState::Loading);
    let farmers = RwSignal::new(PageState::<FarmerRecord>::new(DEFAULT_PAGE_SIZE));
    let farmers_load = RwSignal::new(LoadState::Loading);

    {
        let client = api_client.clone();
        let id = aggregator_id.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let value = match api::fetch_summary(&client, &id).await {
                Ok(s) => s,
                Err(e) => {
                    log::warn!("dashboard summary unavailable: {}", e);
                    report_api_error(set_auth_state, &e);
                    DashboardSummary::default()
                }
            };
            summary.set(Some(value));
        });
    }
    {
        let client = api_client.clone();
        let id = aggregator_id.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match api::fetch_my_requests(&client, &id).await {
                Ok(rows) => {
                    catchments.update(|s| s.load(rows));
                    catchments_load.set(LoadState::Loaded);
                }
                Err(e) => {
                    log::error!("failed to load catchment requests: {}", e);
                    catchments_load.set(LoadState::Failed(report_api_error(set_auth_state, &e)));
                }
            }
        });
    }
    {
        let client = api_client;
        let id = aggregator_id;
        wasm_bindgen_futures::spawn_local(async move {
            match api::fetch_farmers(&client, &id).await {
                Ok(rows) => {
                    farmers.update(|s| s.load(rows));
                    farmers_load.set(LoadState::Loaded);
                }
                Err(e) => {
                    log::error!("failed to load farmers: {}", e);
                    farmers_load.set(LoadState::Failed(report_api_error(set_auth_state, &e)));
                }
            }
        });
    }

    let counter = move |pick: fn(&DashboardSummary) -> u32| {
        Signal::derive(move || summary.with(|s| s.as_ref().map(|s| u64::from(pick(s)))))
    };

    view! {
        <PageFrame page_id="dashboard--dashboard" category=PAGE_CAT_DASHBOARD>
            <PageHeader title="Dashboard" subtitle=org_name>
                <button class="button button--primary" on:click=move |_| ctx.navigate(Page::CatchmentRequest)>
                    "New Catchment Request"
                </button>
            </PageHeader>

            <div class="page__content">
                <div class="stat-cards">
                    <StatCard label="Approved Catchment Areas" icon_name="map-pin" value=counter(|s| s.approved_catchments) />
                    <StatCard label="Approved Farmers" icon_name="users" value=counter(|s| s.approved_farmers) />
                    <StatCard label="Total Batches" icon_name="package" value=counter(|s| s.total_batches) />
                </div>

                <section class="dashboard-section">
                    <h2>"My Catchment Areas"</h2>
                    {paged_table(CATCHMENT_HEADERS, catchments, catchments_load, "No catchment requests yet", catchment_row)}
                </section>

                <section class="dashboard-section">
                    <h2>"Farmers"</h2>
                    {paged_table(FARMER_HEADERS, farmers, farmers_load, "No farmers in your catchment areas", farmer_row)}
                </section>
            </div>
        </PageFrame>
    }
}
