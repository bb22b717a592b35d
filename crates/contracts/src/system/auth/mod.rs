use serde::{Deserialize, Serialize};

use crate::enums::{ApplicationStatus, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authenticated portal user as returned by `/auth/login` and kept in
/// local storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub org_name: Option<String>,
    #[serde(default)]
    pub role: String,
    pub user_role: UserRole,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
}

impl SessionUser {
    pub fn display_name(&self) -> &str {
        self.org_name.as_deref().unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub access_token: String,
    pub user: SessionUser,
    #[serde(default)]
    pub role_message: Option<String>,
}

/// Failure body: `{success: false, error, message}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginFailure {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginErrorKind {
    UsernameNotFound,
    IncorrectPassword,
    AccountPending,
    AccountRejected,
}

impl LoginErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            LoginErrorKind::UsernameNotFound => "username_not_found",
            LoginErrorKind::IncorrectPassword => "incorrect_password",
            LoginErrorKind::AccountPending => "account_pending",
            LoginErrorKind::AccountRejected => "account_rejected",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "username_not_found" => Some(LoginErrorKind::UsernameNotFound),
            "incorrect_password" => Some(LoginErrorKind::IncorrectPassword),
            "account_pending" => Some(LoginErrorKind::AccountPending),
            "account_rejected" => Some(LoginErrorKind::AccountRejected),
            _ => None,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            LoginErrorKind::UsernameNotFound => "Username not found. Please check your username.",
            LoginErrorKind::IncorrectPassword => "Incorrect password. Please try again.",
            LoginErrorKind::AccountPending => {
                "Your account is pending admin approval. Please wait for approval."
            }
            LoginErrorKind::AccountRejected => {
                "Your account has been rejected. Please contact admin for more information."
            }
        }
    }
}

impl LoginFailure {
    pub fn for_kind(kind: LoginErrorKind) -> Self {
        Self {
            success: false,
            error: Some(kind.code().to_string()),
            message: Some(kind.user_message().to_string()),
        }
    }

    /// Message for the login form: known kinds get their fixed text.
    pub fn user_message(&self) -> String {
        match self.error.as_deref().and_then(LoginErrorKind::from_code) {
            Some(kind) => kind.user_message().to_string(),
            None => self
                .message
                .clone()
                .unwrap_or_else(|| "Login failed. Please try again.".to_string()),
        }
    }
}

/// Where a user lands after logging in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginLanding {
    AdminApprovals,
    Dashboard,
    /// Buyers have no portal yet; the notice is shown on the login page.
    Notice(String),
}

impl LoginLanding {
    pub fn for_user(user: &SessionUser, role_message: Option<&str>) -> Self {
        match user.user_role {
            UserRole::Admin => LoginLanding::AdminApprovals,
            UserRole::Aggregator => LoginLanding::Dashboard,
            UserRole::Buyer => LoginLanding::Notice(
                role_message
                    .unwrap_or("Buyer portal is under development. Please check back later.")
                    .to_string(),
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    pub username: String,
    pub user_role: u8,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: u8) -> SessionUser {
        serde_json::from_value(serde_json::json!({
            "user_id": "AGG-2619283",
            "username": "greenearth",
            "org_name": "Green Earth Aggregators",
            "role": "aggregator",
            "user_role": role,
            "status": 1
        }))
        .unwrap()
    }

    #[test]
    fn test_landing_by_role() {
        assert_eq!(LoginLanding::for_user(&user(1), None), LoginLanding::AdminApprovals);
        assert_eq!(LoginLanding::for_user(&user(2), None), LoginLanding::Dashboard);
        match LoginLanding::for_user(&user(3), None) {
            LoginLanding::Notice(text) => assert!(text.contains("under development")),
            other => panic!("unexpected landing {:?}", other),
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let parsed: Result<SessionUser, _> = serde_json::from_value(serde_json::json!({
            "user_id": "X", "username": "x", "user_role": 9
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_failure_messages() {
        let pending: LoginFailure =
            serde_json::from_str(r#"{"success":false,"error":"account_pending","message":"x"}"#)
                .unwrap();
        assert!(pending.user_message().contains("pending admin approval"));

        let other: LoginFailure =
            serde_json::from_str(r#"{"success":false,"error":"locked","message":"Locked out"}"#)
                .unwrap();
        assert_eq!(other.user_message(), "Locked out");
        assert_eq!(LoginFailure::default().user_message(), "Login failed. Please try again.");
    }
}
