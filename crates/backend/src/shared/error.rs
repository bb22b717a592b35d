use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::api_error::ErrorBody;

use crate::store::StoreError;

/// Handler failure, rendered as `{detail}` with the mapped status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Not authenticated")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::ApplicantNotFound { .. }
            | StoreError::BatchNotFound(_)
            | StoreError::CropNotFound(_) => AppError::NotFound(message),
            StoreError::AlreadyReviewed { .. } => AppError::Conflict(message),
            StoreError::EmailTaken | StoreError::UsernameTaken => AppError::BadRequest(message),
            StoreError::DuplicateCatchment | StoreError::CropExists(_) => {
                AppError::Conflict(message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Internal(e) => {
                tracing::error!("internal error: {:#}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody::detail(detail))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_statuses() {
        assert_eq!(AppError::from(StoreError::EmailTaken).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::from(StoreError::DuplicateCatchment).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::from(StoreError::CropExists("C001".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(StoreError::BatchNotFound("B-1".into())).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let response = AppError::Internal(anyhow::anyhow!("disk on fire")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
