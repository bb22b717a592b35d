use contracts::domain::catchment::{CatchmentField, CatchmentForm};
use leptos::prelude::*;

/// One `<select>` bound to a field of the chain.
#[component]
pub fn ChainSelect(
    field: CatchmentField,
    form: RwSignal<CatchmentForm>,
    /// Whether to show the "please select" hint of empty required fields
    show_errors: RwSignal<bool>,
    on_select: Callback<(CatchmentField, String)>,
) -> impl IntoView {
    let node = move || form.with(|f| f.chain.node(field).cloned());
    let label = form.with_untracked(|f| {
        f.chain
            .node(field)
            .map(|n| (n.spec.label, n.spec.required))
            .unwrap_or(("", false))
    });

    view! {
        <div class="form-group">
            <label for=field.id()>
                {label.0}
                {label.1.then_some(" *")}
            </label>
            <select
                id=field.id()
                name=field.id()
                prop:disabled=move || node().map(|n| !n.enabled).unwrap_or(true)
                on:change=move |ev| on_select.run((field, event_target_value(&ev)))
            >
                {move || {
                    node().map(|n| {
                        let current = n.value.clone();
                        let placeholder = n.placeholder.clone().map(|text| {
                            view! { <option value="" selected=current.is_empty()>{text}</option> }
                        });
                        let options = n
                            .options
                            .into_iter()
                            .map(|o| {
                                let selected = o.value == current;
                                view! { <option value=o.value selected=selected>{o.label}</option> }
                            })
                            .collect_view();
                        (placeholder, options)
                    })
                }}
            </select>
            {move || {
                show_errors
                    .get()
                    .then(|| form.with(|f| f.chain.field_error(field)))
                    .flatten()
                    .map(|e| view! { <div class="field-error">{e}</div> })
            }}
        </div>
    }
}
