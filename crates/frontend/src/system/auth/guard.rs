use contracts::enums::UserRole;
use leptos::prelude::*;

use super::context::use_auth;

/// Component that requires a signed-in user with the given role
/// Shows fallback otherwise
#[component]
pub fn RequireRole(role: UserRole, children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || {
                let state = auth_state.get();
                state.is_authenticated() && state.role() == Some(role)
            }
            fallback=move || view! {
                <div class="alert alert--error">
                    {format!("Access denied. {} privileges required.", role.display_name())}
                </div>
            }
        >
            {children()}
        </Show>
    }
}
