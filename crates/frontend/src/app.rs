use crate::domain::registration::ui::provide_registration_drafts;
use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::AppRoutes;
use crate::shared::api_utils::{provide_api_client, ApiClient};
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    let api_client = ApiClient::from_document();
    log::info!("API base URL: {}", api_client.base_url());
    provide_api_client(api_client);

    // Provide the AppGlobalContext store to the whole app via context.
    provide_context(AppGlobalContext::new());

    provide_registration_drafts();

    view! {
        <ConfigProvider>
            <AuthProvider>
                <AppRoutes />
            </AuthProvider>
        </ConfigProvider>
    }
}
