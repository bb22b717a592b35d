use contracts::enums::ApplicationStatus;
use leptos::prelude::*;

/// Colored status tag for catchment and farmer rows.
#[component]
pub fn StatusBadge(status: ApplicationStatus) -> impl IntoView {
    view! {
        <span class=format!("status-badge {}", status.css_class())>{status.display_name()}</span>
    }
}
