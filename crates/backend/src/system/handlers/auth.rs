use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::enums::{ApplicationStatus, UserRole};
use contracts::system::auth::{LoginErrorKind, LoginFailure, LoginResponse};

use crate::shared::error::AppError;
use crate::shared::form::FormFields;
use crate::shared::state::AppState;
use crate::system::auth::password::verify_password;

const BUYER_PORTAL_NOTICE: &str = "Buyer portal is under development. Please check back later.";

fn failure(kind: LoginErrorKind) -> Response {
    let status = match kind {
        LoginErrorKind::UsernameNotFound | LoginErrorKind::IncorrectPassword => {
            StatusCode::UNAUTHORIZED
        }
        LoginErrorKind::AccountPending | LoginErrorKind::AccountRejected => StatusCode::FORBIDDEN,
    };
    (status, Json(LoginFailure::for_kind(kind))).into_response()
}

/// Login handler. Accepts `username` and `password` as form fields.
pub async fn login(State(state): State<AppState>, form: FormFields) -> Result<Response, AppError> {
    let username = form.text("username");
    let password = form.raw("password");
    if username.is_empty() || password.is_empty() {
        let body = LoginFailure {
            success: false,
            error: Some("validation".to_string()),
            message: Some("Username and password are required".to_string()),
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response());
    }

    let account = state.store.read().await.find_by_username(&username).cloned();
    let Some(account) = account else {
        tracing::info!("Login failed, unknown username {}", username);
        return Ok(failure(LoginErrorKind::UsernameNotFound));
    };

    let stored_hash = account.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .context("Password verification task failed")??;
    if !verified {
        tracing::info!("Login failed, wrong password for {}", username);
        return Ok(failure(LoginErrorKind::IncorrectPassword));
    }

    match account.status {
        ApplicationStatus::Pending => return Ok(failure(LoginErrorKind::AccountPending)),
        ApplicationStatus::Rejected => return Ok(failure(LoginErrorKind::AccountRejected)),
        ApplicationStatus::Approved => {}
    }

    let access_token = state.jwt.generate_access_token(&account)?;
    tracing::info!("User {} ({}) logged in", account.username, account.role.slug());

    let role_message = (account.role == UserRole::Buyer).then(|| BUYER_PORTAL_NOTICE.to_string());
    Ok(Json(LoginResponse {
        success: true,
        access_token,
        user: account.session_user(),
        role_message,
    })
    .into_response())
}
