use contracts::system::auth::SessionUser;
use web_sys::window;

const ACCESS_TOKEN_KEY: &str = "access_token";
const USER_KEY: &str = "user";
const USER_ID_KEY: &str = "user_id";
const USERNAME_KEY: &str = "username";
const USER_ROLE_KEY: &str = "user_role";
const ROLE_KEY: &str = "role";

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

/// Save access token to localStorage
pub fn save_access_token(token: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.set_item(ACCESS_TOKEN_KEY, token);
    }
}

/// Get access token from localStorage
pub fn get_access_token() -> Option<String> {
    get_local_storage()?
        .get_item(ACCESS_TOKEN_KEY)
        .ok()?
        .filter(|t| !t.is_empty())
}

/// Stores the user object plus the flat keys other pages read.
pub fn save_user(user: &SessionUser) {
    let Some(storage) = get_local_storage() else {
        return;
    };
    if let Ok(json) = serde_json::to_string(user) {
        let _ = storage.set_item(USER_KEY, &json);
    }
    let _ = storage.set_item(USER_ID_KEY, &user.user_id);
    let _ = storage.set_item(USERNAME_KEY, &user.username);
    let _ = storage.set_item(USER_ROLE_KEY, &user.user_role.code().to_string());
    let _ = storage.set_item(ROLE_KEY, &user.role);
}

/// Stored user, `None` when absent or unreadable.
pub fn get_user() -> Option<SessionUser> {
    let json = get_local_storage()?.get_item(USER_KEY).ok()??;
    match serde_json::from_str(&json) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("Discarding unreadable stored user: {}", e);
            None
        }
    }
}

/// Clear all authentication data
pub fn clear_session() {
    if let Some(storage) = get_local_storage() {
        for key in [
            ACCESS_TOKEN_KEY,
            USER_KEY,
            USER_ID_KEY,
            USERNAME_KEY,
            USER_ROLE_KEY,
            ROLE_KEY,
        ] {
            let _ = storage.remove_item(key);
        }
    }
}
