//! PageFrame: standard root wrapper for every page.
//!
//! Sets `id` (`"{entity}--{category}"`) and `data-page-category` on the root
//! element.

use super::page_standard::*;
use leptos::prelude::*;

/// Root wrapper that sets standard metadata on every page.
///
/// Adds the BEM modifier class based on category:
/// - `list`      → `page`
/// - `detail`    → `page page--detail`
/// - `dashboard` → `page page--dashboard`
/// - `form`      → `page page--form`
/// - `system`    → `page page--system`
#[component]
pub fn PageFrame(
    /// HTML id in format `{entity}--{category}`, e.g. `"approvals--list"`.
    page_id: &'static str,
    /// One of the PAGE_CAT_* constants from `page_standard`.
    category: &'static str,
    /// Additional CSS classes appended after the base class.
    #[prop(optional)]
    class: &'static str,
    children: Children,
) -> impl IntoView {
    debug_assert!(is_valid_page_id(page_id), "bad page id {page_id}");

    let base_class = match category {
        PAGE_CAT_LIST => "page",
        PAGE_CAT_DETAIL => "page page--detail",
        PAGE_CAT_DASHBOARD => "page page--dashboard",
        PAGE_CAT_FORM => "page page--form",
        PAGE_CAT_SYSTEM => "page page--system",
        _ => "page",
    };

    let full_class = if class.is_empty() {
        base_class.to_string()
    } else {
        format!("{base_class} {class}")
    };

    view! {
        <div
            id=page_id
            class=full_class
            data-page-category=category
        >
            {children()}
        </div>
    }
}
