use contracts::shared::api_error::ApiError;
use contracts::system::auth::{LoginFailure, LoginResponse};

use crate::shared::api_utils::{form_data, ApiClient};

/// Login with username and password.
///
/// Rejections come back as the user-facing message for the error kind.
pub async fn login(api: &ApiClient, username: &str, password: &str) -> Result<LoginResponse, String> {
    let form = form_data(&[
        ("username".to_string(), username.to_string()),
        ("password".to_string(), password.to_string()),
    ])
    .map_err(|e| e.to_string())?;

    let response = api
        .post_form("/auth/login", form)
        .await
        .map_err(|e| e.to_string())?;
    let ok = response.ok();
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()).to_string())?;

    if ok {
        if let Ok(parsed) = serde_json::from_str::<LoginResponse>(&text) {
            if parsed.success {
                return Ok(parsed);
            }
        }
    }

    match serde_json::from_str::<LoginFailure>(&text) {
        Ok(failure) => Err(failure.user_message()),
        Err(_) => Err(ApiError::from_status(status, &text).to_string()),
    }
}
