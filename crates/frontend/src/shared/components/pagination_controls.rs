use crate::shared::icons::icon;
use contracts::shared::pagination::PagerInfo;
use leptos::prelude::*;

/// PaginationControls component - Previous / "Page X of Y" / Next
///
/// Pages are 1-based. Both buttons are disabled on a single (possibly empty)
/// page.
#[component]
pub fn PaginationControls(
    /// Pager snapshot of the table
    #[prop(into)]
    pager: Signal<PagerInfo>,

    /// Callback with the requested 1-based page
    on_page_change: Callback<usize>,
) -> impl IntoView {
    view! {
        <div class="pagination-controls">
            <span class="pagination-range">
                {move || {
                    let p = pager.get();
                    if p.total_count == 0 {
                        "No entries".to_string()
                    } else {
                        format!("Showing {}-{} of {}", p.first_shown, p.last_shown, p.total_count)
                    }
                }}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let p = pager.get();
                    if p.has_previous {
                        on_page_change.run(p.page - 1);
                    }
                }
                disabled=move || !pager.get().has_previous
                title="Previous page"
            >
                {icon("chevron-left")}
                " Previous"
            </button>
            <span class="pagination-info">{move || pager.get().label()}</span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let p = pager.get();
                    if p.has_next {
                        on_page_change.run(p.page + 1);
                    }
                }
                disabled=move || !pager.get().has_next
                title="Next page"
            >
                "Next "
                {icon("chevron-right")}
            </button>
        </div>
    }
}
