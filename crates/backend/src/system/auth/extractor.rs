use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use contracts::enums::UserRole;
use contracts::system::auth::TokenClaims;

use crate::shared::error::AppError;

/// Claims of the caller, set by the auth middleware.
/// Usage in handlers: `async fn handler(CurrentUser(claims): CurrentUser) -> Response`
pub struct CurrentUser(pub TokenClaims);

impl CurrentUser {
    pub fn role(&self) -> Option<UserRole> {
        UserRole::try_from(self.0.user_role).ok()
    }

    /// Aggregator data is visible to its owner and to admins.
    pub fn ensure_can_view(&self, aggregator_id: &str) -> Result<(), AppError> {
        if self.role() == Some(UserRole::Admin) || self.0.sub == aggregator_id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Not allowed to view another aggregator's data".to_string(),
            ))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(sub: &str, role: UserRole) -> CurrentUser {
        CurrentUser(TokenClaims {
            sub: sub.to_string(),
            username: "u".to_string(),
            user_role: role.code(),
            exp: 0,
            iat: 0,
        })
    }

    #[test]
    fn test_visibility() {
        assert!(user("AGG-1", UserRole::Aggregator).ensure_can_view("AGG-1").is_ok());
        assert!(user("AGG-2", UserRole::Aggregator).ensure_can_view("AGG-1").is_err());
        assert!(user("ADMIN-001", UserRole::Admin).ensure_can_view("AGG-1").is_ok());
    }
}
