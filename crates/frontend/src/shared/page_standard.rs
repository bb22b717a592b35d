//! Page category constants.
//!
//! Every page declares an HTML `id` in the format `{entity}--{category}`
//! (e.g. `"approvals--list"`) and a `data-page-category` with one of the
//! constants below.

/// Table of records with a pager.
pub const PAGE_CAT_LIST: &str = "list";

/// Single-record view (traceability).
pub const PAGE_CAT_DETAIL: &str = "detail";

/// Summary cards plus tables.
pub const PAGE_CAT_DASHBOARD: &str = "dashboard";

/// Data-entry form (registration, catchment request).
pub const PAGE_CAT_FORM: &str = "form";

/// Login and other pages outside the signed-in shell.
pub const PAGE_CAT_SYSTEM: &str = "system";

/// All known category values.
pub const ALL_CATEGORIES: &[&str] = &[
    PAGE_CAT_LIST,
    PAGE_CAT_DETAIL,
    PAGE_CAT_DASHBOARD,
    PAGE_CAT_FORM,
    PAGE_CAT_SYSTEM,
];

/// Validate that a page id matches the `{entity}--{category}` format.
pub fn is_valid_page_id(id: &str) -> bool {
    let parts: Vec<&str> = id.splitn(2, "--").collect();
    parts.len() == 2 && !parts[0].is_empty() && ALL_CATEGORIES.contains(&parts[1])
}
