use contracts::shared::pagination::{LoadState, PageState};
use leptos::prelude::*;

use super::pagination_controls::PaginationControls;

/// Table with a header row, the current page of `state` and its pager.
///
/// The body is rebuilt from scratch on every page change.
pub fn paged_table<T>(
    headers: &'static [&'static str],
    state: RwSignal<PageState<T>>,
    load: RwSignal<LoadState>,
    empty_message: &'static str,
    render_row: fn(T) -> AnyView,
) -> impl IntoView
where
    T: Clone + Send + Sync + 'static,
{
    let columns = headers.len().to_string();
    let body = move || {
        let message = match load.get() {
            LoadState::Loading => Some("Loading..."),
            LoadState::Failed(_) => Some(LoadState::FAILED_MESSAGE),
            LoadState::Loaded if state.with(PageState::is_empty) => Some(empty_message),
            LoadState::Loaded => None,
        };
        match message {
            Some(text) => view! {
                <tr>
                    <td class="table__cell table__cell--muted" colspan=columns.clone()>{text}</td>
                </tr>
            }
            .into_any(),
            None => state
                .with(|s| s.page_view().rows.to_vec())
                .into_iter()
                .map(render_row)
                .collect_view()
                .into_any(),
        }
    };

    view! {
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
            pager=Signal::derive(move || state.with(PageState::pager))
            on_page_change=Callback::new(move |page: usize| {
                state.update(|s| {
                    s.go_to_page(page);
                });
            })
        />
    }
}
