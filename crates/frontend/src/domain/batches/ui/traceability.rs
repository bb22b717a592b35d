use contracts::domain::batches::{format_date, format_quantity, TraceabilityResponse};
use leptos::prelude::*;

use crate::domain::batches::api;
use crate::layout::global_context::{use_global_context, Page};
use crate::shared::api_utils::use_api;
use crate::shared::components::page_header::PageHeader;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_DETAIL;
use crate::system::auth::context::{report_api_error, use_auth};

#[component]
pub fn TraceabilityPage(batch_id: String) -> impl IntoView {
    let ctx = use_global_context();
    let (_, set_auth_state) = use_auth();
    let trace = RwSignal::new(None::<TraceabilityResponse>);
    let error = RwSignal::new(None::<String>);

    let client = use_api();
    let id = batch_id.clone();
    wasm_bindgen_futures::spawn_local(async move {
        match api::fetch_traceability(&client, &id).await {
            Ok(t) => trace.set(Some(t)),
            Err(e) => {
                log::error!("traceability for {} failed: {}", id, e);
                error.set(Some(report_api_error(set_auth_state, &e)));
            }
        }
    });

    let content = move || {
        if let Some(e) = error.get() {
            return view! { <div class="alert alert--error">{e}</div> }.into_any();
        }
        let Some(t) = trace.get() else {
            return view! { <p class="page__hint">"Loading traceability..."</p> }.into_any();
        };

        let batch = &t.batch;
        let season = match (&t.season, &t.period) {
            (Some(s), Some(p)) => format!("{} {}", s, p),
            (Some(s), None) => s.clone(),
            _ => "-".to_string(),
        };
        let timeline = t
            .timeline()
            .into_iter()
            .map(|e| {
                let detail = [e.location.as_deref(), e.actor.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" · ");
                view! {
                    <li class="timeline__event">
                        <div class="timeline__stage">{e.stage.clone()}</div>
                        <div class="timeline__time">{e.timestamp.format("%d %b %Y %H:%M").to_string()}</div>
                        <div class="timeline__detail">{detail}</div>
                    </li>
                }
            })
            .collect_view();
        let farmers = t
            .farmers
            .iter()
            .map(|f| {
                view! {
                    <tr class="table__row">
                        <td class="table__cell">{f.farmer_id.clone()}</td>
                        <td class="table__cell">{f.name.clone()}</td>
                        <td class="table__cell">{f.village.clone().unwrap_or_else(|| "-".to_string())}</td>
                        <td class="table__cell">{f.mandal.clone().unwrap_or_else(|| "-".to_string())}</td>
                        <td class="table__cell">{format!("{:.2}", f.acreage)}</td>
                        <td class="table__cell">{format_quantity(f.quantity)}</td>
                    </tr>
                }
            })
            .collect_view();

        view! {
            <section class="trace-batch">
                <h2>{batch.title()}</h2>
                <dl>
                    <dt>"Batch ID"</dt>
                    <dd>{batch.batch_id.clone()}</dd>
                    <dt>"Season"</dt>
                    <dd>{season}</dd>
                    <dt>"Procured"</dt>
                    <dd>{format_date(&batch.procurement_date)}</dd>
                    <dt>"Total Quantity"</dt>
                    <dd>{format_quantity(batch.total_quantity())}</dd>
                    <dt>"Aggregator"</dt>
                    <dd>{batch.aggregator_name.clone().unwrap_or_else(|| "-".to_string())}</dd>
                </dl>
            </section>
            <section class="trace-farmers">
                <h2>"Contributing Farmers"</h2>
                <div class="table">
                    <table class="table__data table--striped">
                        <thead class="table__head">
                            <tr>
                                <th class="table__header-cell">"Farmer ID"</th>
                                <th class="table__header-cell">"Name"</th>
                                <th class="table__header-cell">"Village"</th>
                                <th class="table__header-cell">"Mandal"</th>
                                <th class="table__header-cell">"Acreage"</th>
                                <th class="table__header-cell">"Quantity"</th>
                            </tr>
                        </thead>
                        <tbody>{farmers}</tbody>
                    </table>
                </div>
            </section>
            <section class="trace-timeline">
                <h2>"Journey"</h2>
                <ol class="timeline">{timeline}</ol>
            </section>
        }
        .into_any()
    };

    view! {
        <PageFrame page_id="traceability--detail" category=PAGE_CAT_DETAIL>
            <PageHeader title="Traceability" subtitle=batch_id>
                <button class="button button--secondary" on:click=move |_| ctx.navigate(Page::Batches)>
                    "Back to Batches"
                </button>
            </PageHeader>
            <div class="page__content">{content}</div>
        </PageFrame>
    }
}
