//! TopHeader component - application top navigation bar.
//!
//! Brand, the pages of the signed-in role, user name and logout.

use crate::layout::global_context::{nav_items, use_global_context, Page};
use crate::shared::icons::icon;
use crate::system::auth::context::{do_logout, use_auth};
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_global_context();
    let (auth_state, set_auth_state) = use_auth();

    let logout = move |_| {
        log::info!("logout");
        do_logout(set_auth_state);
        ctx.navigate(Page::Login);
    };

    let nav = move || {
        let role = auth_state.with(|s| s.role());
        role.map(nav_items)
            .unwrap_or_default()
            .into_iter()
            .map(|page| {
                let target = page.clone();
                let slug = page.slug();
                let is_active = move || {
                    let active = ctx.active.get();
                    active.slug() == slug
                        || (slug == "batches" && matches!(active, Page::Traceability(_)))
                };
                view! {
                    <button
                        class=move || {
                            if is_active() {
                                "top-header__nav-item top-header__nav-item--active"
                            } else {
                                "top-header__nav-item"
                            }
                        }
                        on:click=move |_| ctx.navigate(target.clone())
                    >
                        {page.title()}
                    </button>
                }
            })
            .collect_view()
    };

    let user_name = move || {
        auth_state.with(|s| {
            s.user
                .as_ref()
                .map(|u| format!("{} ({})", u.display_name(), u.user_role.display_name()))
                .unwrap_or_default()
        })
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <span class="top-header__title">"AgriPortal"</span>
            </div>

            <nav class="top-header__nav">{nav}</nav>

            <div class="top-header__actions">
                <span class="top-header__user">{user_name}</span>
                <Button appearance=ButtonAppearance::Subtle size=ButtonSize::Small on_click=logout>
                    {icon("logout")}
                    " Logout"
                </Button>
            </div>
        </div>
    }
}
