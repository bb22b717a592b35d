use contracts::enums::UserRole;
use contracts::shared::api_error::ApiError;
use contracts::system::auth::{LoginResponse, SessionUser};
use leptos::prelude::*;

use super::storage;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user: Option<SessionUser>,
}

impl AuthState {
    /// Session persisted by a previous login, if both parts survived.
    pub fn restore() -> Self {
        match (storage::get_access_token(), storage::get_user()) {
            (Some(token), Some(user)) => Self {
                access_token: Some(token),
                user: Some(user),
            },
            _ => Self::default(),
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.user_role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }
}

/// Auth context provider component
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState::restore());

    if let Some(user) = auth_state.get_untracked().user {
        log::info!("Restored session for {}", user.username);
    }

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

/// Hook to access auth state
pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");

    (auth_state, set_auth_state)
}

/// Helper: Persist a successful login and publish it
pub fn complete_login(set_auth_state: WriteSignal<AuthState>, response: LoginResponse) {
    storage::save_access_token(&response.access_token);
    storage::save_user(&response.user);
    log::info!(
        "Logged in as {} ({})",
        response.user.username,
        response.user.user_role.display_name()
    );
    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user: Some(response.user),
    });
}

/// Helper: Perform logout
pub fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    storage::clear_session();
    set_auth_state.set(AuthState::default());
}

/// Helper: drop a session the backend no longer accepts
pub fn expire_session(set_auth_state: WriteSignal<AuthState>) {
    log::warn!("Session expired, returning to login");
    do_logout(set_auth_state);
}

/// Message to show for a failed call; a rejected token also ends the session.
pub fn report_api_error(set_auth_state: WriteSignal<AuthState>, err: &ApiError) -> String {
    if err.is_unauthorized() {
        expire_session(set_auth_state);
    }
    err.to_string()
}
