use contracts::domain::approvals::{ApprovalRow, ReviewAction};
use contracts::shared::pagination::{LoadState, TableId};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;

use super::state::ApprovalsState;
use crate::domain::approvals::api;
use crate::domain::approvals::ui::documents::DocumentViewer;
use crate::shared::api_utils::{live_client, use_api};
use crate::shared::components::alert::{Alert, AlertBanner};
use crate::shared::components::page_header::PageHeader;
use crate::shared::components::pagination_controls::PaginationControls;
use crate::shared::icons::icon;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_LIST;
use crate::system::auth::context::{report_api_error, use_auth};

/// Delay before refetching after approve/reject, so the backend has
/// committed the change.
const REFETCH_DELAY_MS: u32 = 300;

#[component]
pub fn AdminApprovals() -> impl IntoView {
    let state = ApprovalsState::new();
    let api_client = StoredValue::new(use_api());
    let (_, set_auth_state) = use_auth();

    // also runs after the refetch delay, when the page may already be gone
    let fetch = move |table: TableId| {
        let Some(client) = live_client(api_client) else {
            log::debug!("approvals page closed, skipping {} refetch", table.title());
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            match api::fetch_table(&client, table).await {
                Ok(rows) => {
                    log::debug!("{}: {} rows", table.title(), rows.len());
                    state.tables.update(|t| t.reload(table, rows));
                    state.set_load_state(table, LoadState::Loaded);
                }
                Err(e) => {
                    log::error!("Failed to load {}: {}", table.title(), e);
                    let message = report_api_error(set_auth_state, &e);
                    state.set_load_state(table, LoadState::Failed(message));
                }
            }
        });
    };

    let refresh_all = move || {
        for table in TableId::all() {
            fetch(table);
        }
    };

    let on_review = Callback::new(move |(action, row): (ReviewAction, ApprovalRow)| {
        let kind = row.kind();
        let user_id = row.user_id().to_string();
        let prompt = action.confirm_prompt(kind, row.org_name());
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message(&prompt).ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        state.alert.set(None);
        state.processing.update(|p| {
            p.insert(user_id.clone());
        });
        let client = api_client.get_value();
        wasm_bindgen_futures::spawn_local(async move {
            let result = api::review(&client, action, kind, &user_id).await;
            state.processing.update(|p| {
                p.remove(&user_id);
            });
            match result {
                Ok(response) => {
                    log::info!("{} {} {}", action.slug(), kind.slug(), user_id);
                    state.alert.set(Some(Alert::success(response.message)));
                    let table = kind.table();
                    state
                        .tables
                        .update(|t| t.table_mut(table).retain_page_after_removal(1));
                    TimeoutFuture::new(REFETCH_DELAY_MS).await;
                    fetch(table);
                    fetch(TableId::History);
                }
                Err(e) => {
                    log::warn!("{} {} {} failed: {}", action.slug(), kind.slug(), user_id, e);
                    let message = report_api_error(set_auth_state, &e);
                    state.alert.set(Some(Alert::error(message)));
                }
            }
        });
    });

    let on_view = Callback::new(move |row: ApprovalRow| state.viewing.set(Some(row)));

    refresh_all();

    view! {
        <PageFrame page_id="approvals--list" category=PAGE_CAT_LIST>
            <PageHeader title="Admin Approvals" subtitle="Review pending registrations".to_string()>
                <button class="button button--secondary" on:click=move |_| refresh_all()>
                    {icon("refresh")}
                    " Refresh"
                </button>
            </PageHeader>

            <AlertBanner alert=state.alert />

            <div class="page__content">
                {TableId::all()
                    .into_iter()
                    .map(|table| view! {
                        <ApprovalTable table=table state=state on_review=on_review on_view=on_view />
                    })
                    .collect_view()}
            </div>

            <DocumentViewer row=state.viewing base_url=api_client.with_value(|c| c.base_url().to_string()) />
        </PageFrame>
    }
}

/// One of the three tables with its pager.
#[component]
fn ApprovalTable(
    table: TableId,
    state: ApprovalsState,
    on_review: Callback<(ReviewAction, ApprovalRow)>,
    on_view: Callback<ApprovalRow>,
) -> impl IntoView {
    let is_history = table == TableId::History;
    let headers: &'static [&'static str] = if is_history {
        &["Type", "User ID", "Organization", "Org Type", "Email", "Mobile", "Documents", "Status"]
    } else {
        &["User ID", "Organization", "Type", "Email", "Mobile", "Documents", "Actions"]
    };
    let columns = headers.len();

    let body = move || {
        let rows = state.tables.with(|t| t.current_rows(table));
        match state.load_state(table) {
            LoadState::Loading if rows.is_empty() => {
                return message_row(columns, "Loading...", "table__cell--muted").into_any();
            }
            LoadState::Failed(_) => {
                return message_row(columns, LoadState::FAILED_MESSAGE, "table__cell--error")
                    .into_any();
            }
            _ => {}
        }
        if rows.is_empty() {
            return message_row(columns, table.empty_message(), "table__cell--muted").into_any();
        }
        rows.into_iter()
            .map(|row| render_row(row, state, on_review, on_view))
            .collect_view()
            .into_any()
    };

    view! {
        <section class="approval-section">
            <h2 class="approval-section__title">
                {table.title()}
                <span class="approval-section__count">
                    {move || state.tables.with(|t| t.count(table))}
                </span>
            </h2>
            <div class="table">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            {headers
                                .iter()
                                .map(|h| view! { <th class="table__header-cell">{*h}</th> })
                                .collect_view()}
                        </tr>
                    </thead>
                    <tbody>{body}</tbody>
                </table>
            </div>
            <PaginationControls
                pager=Signal::derive(move || state.tables.with(|t| t.pager(table)))
                on_page_change=Callback::new(move |page: usize| {
                    state.tables.update(|t| {
                        t.go_to_page(table, page);
                    });
                })
            />
        </section>
    }
}

fn message_row(columns: usize, text: &'static str, class: &'static str) -> impl IntoView {
    view! {
        <tr>
            <td class=format!("table__cell {}", class) colspan=columns.to_string()>{text}</td>
        </tr>
    }
}

fn render_row(
    row: ApprovalRow,
    state: ApprovalsState,
    on_review: Callback<(ReviewAction, ApprovalRow)>,
    on_view: Callback<ApprovalRow>,
) -> AnyView {
    let docs_row = row.clone();
    let documents_cell = view! {
        <td class="table__cell">
            <button class="button button--link" on:click=move |_| on_view.run(docs_row.clone())>
                {icon("file")}
                " View"
            </button>
        </td>
    };

    match row.clone() {
        ApprovalRow::Pending(kind, applicant) => {
            let user_id = applicant.user_id.clone();
            let approve_row = row.clone();
            let reject_row = row;
            let actions = move || {
                if state.is_processing(&user_id) {
                    view! { <span class="table__processing">"Processing..."</span> }.into_any()
                } else {
                    let approve_row = approve_row.clone();
                    let reject_row = reject_row.clone();
                    view! {
                        <button
                            class="button button--success button--small"
                            on:click=move |_| on_review.run((ReviewAction::Approve, approve_row.clone()))
                        >
                            {icon("check")}
                            " Approve"
                        </button>
                        <button
                            class="button button--danger button--small"
                            on:click=move |_| on_review.run((ReviewAction::Reject, reject_row.clone()))
                        >
                            {icon("x")}
                            " Reject"
                        </button>
                    }
                    .into_any()
                }
            };
            view! {
                <tr class="table__row">
                    <td class="table__cell">{applicant.user_id.clone()}</td>
                    <td class="table__cell">{applicant.org_name.clone()}</td>
                    <td class="table__cell">{non_empty(&applicant.org_type, kind.display_name())}</td>
                    <td class="table__cell">{applicant.email.clone()}</td>
                    <td class="table__cell">{applicant.mobile.clone()}</td>
                    {documents_cell}
                    <td class="table__cell table__cell--actions">{actions}</td>
                </tr>
            }
            .into_any()
        }
        ApprovalRow::History(record) => view! {
            <tr class="table__row">
                <td class="table__cell">{record.kind.display_name()}</td>
                <td class="table__cell">{record.user_id.clone()}</td>
                <td class="table__cell">{record.org_name.clone()}</td>
                <td class="table__cell">{non_empty(&record.org_type, "-")}</td>
                <td class="table__cell">{record.email.clone()}</td>
                <td class="table__cell">{record.mobile.clone()}</td>
                {documents_cell}
                <td class="table__cell">
                    <span class=format!("tag {}", record.status.css_class())>
                        {record.status.display_name()}
                    </span>
                </td>
            </tr>
        }
        .into_any(),
    }
}

fn non_empty(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
