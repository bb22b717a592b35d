use serde::{Deserialize, Serialize};

/// Failure of a call against the portal API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Connection error. Please check if the backend server is running. ({0})")]
    Network(String),
    #[error("{detail}")]
    Status { status: u16, detail: String },
    #[error("Invalid response from server: {0}")]
    Decode(String),
    #[error("Session expired. Please login again.")]
    Unauthorized,
}

impl ApiError {
    /// Builds the error for a non-2xx answer from its raw body.
    ///
    /// FastAPI-style `{detail}` wins over `{message}` and `{error}`; bodies
    /// that are not JSON fall back to the status code.
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_text)
            .unwrap_or_else(|| format!("Request failed: HTTP {}", status));
        ApiError::Status { status, detail }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Error payload shapes the backend produces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Default::default()
        }
    }

    pub fn into_text(self) -> Option<String> {
        self.detail.or(self.message).or(self.error)
    }
}
