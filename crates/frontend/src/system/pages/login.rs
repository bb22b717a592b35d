use contracts::domain::approvals::ApplicantKind;
use contracts::system::auth::LoginLanding;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::layout::global_context::{use_global_context, Page};
use crate::shared::api_utils::use_api;
use crate::shared::page_frame::PageFrame;
use crate::shared::page_standard::PAGE_CAT_SYSTEM;
use crate::system::auth::{api, context::complete_login, context::use_auth};

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_global_context();
    let api_client = StoredValue::new(use_api());
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);
    let (is_loading, set_is_loading) = signal(false);

    let (_, set_auth_state) = use_auth();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let username_val = username.get().trim().to_string();
        let password_val = password.get();
        if username_val.is_empty() || password_val.is_empty() {
            set_error_message.set(Some("Please enter username and password".to_string()));
            return;
        }

        set_is_loading.set(true);
        set_error_message.set(None);
        set_notice.set(None);

        let client = api_client.get_value();
        spawn_local(async move {
            match api::login(&client, &username_val, &password_val).await {
                Ok(response) => {
                    let landing =
                        LoginLanding::for_user(&response.user, response.role_message.as_deref());
                    match landing {
                        LoginLanding::Notice(text) => {
                            log::info!("{} has no portal yet", response.user.username);
                            set_notice.set(Some(text));
                        }
                        LoginLanding::AdminApprovals => {
                            complete_login(set_auth_state, response);
                            ctx.navigate(Page::AdminApprovals);
                        }
                        LoginLanding::Dashboard => {
                            complete_login(set_auth_state, response);
                            ctx.navigate(Page::Dashboard);
                        }
                    }
                }
                Err(message) => {
                    log::warn!("login failed for {}: {}", username_val, message);
                    set_error_message.set(Some(message));
                }
            }
            set_is_loading.set(false);
        });
    };

    view! {
        <PageFrame page_id="login--system" category=PAGE_CAT_SYSTEM>
            <div class="login-container">
                <div class="login-box">
                    <h1>"AgriPortal"</h1>
                    <h2>"Sign in"</h2>

                    <Show when=move || error_message.get().is_some()>
                        <div class="error-message">
                            {move || error_message.get().unwrap_or_default()}
                        </div>
                    </Show>
                    <Show when=move || notice.get().is_some()>
                        <div class="info-message">
                            {move || notice.get().unwrap_or_default()}
                        </div>
                    </Show>

                    <form on:submit=on_submit>
                        <div class="form-group">
                            <label for="username">"Username"</label>
                            <input
                                type="text"
                                id="username"
                                prop:value=move || username.get()
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                required
                                disabled=move || is_loading.get()
                            />
                        </div>

                        <div class="form-group">
                            <label for="password">"Password"</label>
                            <input
                                type="password"
                                id="password"
                                prop:value=move || password.get()
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                required
                                disabled=move || is_loading.get()
                            />
                        </div>

                        <button
                            type="submit"
                            class="btn-primary"
                            disabled=move || is_loading.get()
                        >
                            {move || if is_loading.get() { "Signing in..." } else { "Login" }}
                        </button>
                    </form>

                    <div class="login-info">
                        <p>"New here? Register as"</p>
                        <button
                            class="button button--link"
                            on:click=move |_| ctx.navigate(Page::Register(ApplicantKind::Aggregator))
                        >
                            "Aggregator"
                        </button>
                        <button
                            class="button button--link"
                            on:click=move |_| ctx.navigate(Page::Register(ApplicantKind::Buyer))
                        >
                            "Buyer"
                        </button>
                    </div>
                </div>
            </div>
        </PageFrame>
    }
}
