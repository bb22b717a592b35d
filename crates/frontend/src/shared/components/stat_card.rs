use crate::shared::icons::icon;
use leptos::prelude::*;

/// Summary counter on the dashboard.
#[component]
pub fn StatCard(
    /// Label displayed above the value
    #[prop(into)]
    label: String,
    /// Icon name from the icon() helper
    icon_name: &'static str,
    /// Counter value (None while loading)
    #[prop(into)]
    value: Signal<Option<u64>>,
) -> impl IntoView {
    let formatted = move || match value.get() {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    };

    view! {
        <div class="stat-card">
            <div class="stat-card__icon">
                {icon(icon_name)}
            </div>
            <div class="stat-card__content">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__value">{formatted}</div>
            </div>
        </div>
    }
}
