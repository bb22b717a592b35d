use leptos::prelude::*;

/// PageHeader component - title row of a page with its action buttons
#[component]
pub fn PageHeader(
    /// Page title (required)
    #[prop(into)]
    title: String,

    /// Optional subtitle, e.g. the signed-in organisation
    #[prop(optional, into)]
    subtitle: MaybeProp<String>,

    /// Action buttons
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    view! {
        <div class="page__header">
            <div class="page__header-text">
                <h1 class="page__title">{title}</h1>
                {move || subtitle.get().map(|s| view! {
                    <div class="page__subtitle">{s}</div>
                })}
            </div>
            <div class="page__actions">
                {children.map(|children| children())}
            </div>
        </div>
    }
}
