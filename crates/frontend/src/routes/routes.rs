use crate::domain::approvals::ui::list::AdminApprovals;
use crate::domain::batches::ui::{BatchList, TraceabilityPage};
use crate::domain::catchment::ui::CatchmentRequestPage;
use crate::domain::crops::ui::CropMasterPage;
use crate::domain::dashboard::ui::AggregatorDashboard;
use crate::domain::registration::ui::RegistrationPage;
use crate::layout::global_context::{use_global_context, Page};
use crate::layout::Shell;
use crate::system::auth::context::use_auth;
use crate::system::auth::guard::RequireRole;
use crate::system::pages::login::LoginPage;
use leptos::prelude::*;
// No Router: the active page lives in AppGlobalContext and is mirrored into `?page=`

fn signed_in_page(page: Page) -> AnyView {
    match page {
        Page::AdminApprovals => view! { <AdminApprovals /> }.into_any(),
        Page::CropMaster => view! { <CropMasterPage /> }.into_any(),
        Page::Dashboard => view! { <AggregatorDashboard /> }.into_any(),
        Page::CatchmentRequest => view! { <CatchmentRequestPage /> }.into_any(),
        Page::Batches => view! { <BatchList /> }.into_any(),
        Page::Traceability(batch_id) => view! { <TraceabilityPage batch_id=batch_id /> }.into_any(),
        Page::Login | Page::Register(_) => ().into_any(),
    }
}

#[component]
pub fn AppRoutes() -> impl IntoView {
    let ctx = use_global_context();
    let (auth_state, _) = use_auth();

    ctx.init_router_integration();

    // no session: back to login; signed in on the login page: go home
    Effect::new(move |_| {
        let page = ctx.active.get();
        let state = auth_state.get();
        let target = match state.role() {
            None if !page.is_public() => Some(Page::Login),
            Some(role) if page == Page::Login => Some(Page::home_for(role)),
            _ => None,
        };
        if let Some(target) = target.filter(|t| *t != page) {
            ctx.navigate(target);
        }
    });

    move || {
        let page = ctx.active.get();
        match page {
            Page::Login => view! { <LoginPage /> }.into_any(),
            Page::Register(kind) => view! { <RegistrationPage kind=kind /> }.into_any(),
            page => match page.required_role() {
                Some(role) if auth_state.with(|s| s.is_authenticated()) => view! {
                    <Shell>
                        <RequireRole role=role>
                            {
                                let page = page.clone();
                                move || signed_in_page(page.clone())
                            }
                        </RequireRole>
                    </Shell>
                }
                .into_any(),
                _ => view! { <LoginPage /> }.into_any(),
            },
        }
    }
}
