//! Normalization of submission responses.
//!
//! Registration and request endpoints answer either flat
//! (`{message, aggregator_id, username, status}`) or nested under `data`
//! (`{success, message, data: {buyer_id, username, status}}`). Both shapes are
//! accepted here and reduced to one [`SubmissionReceipt`].

use serde::{Deserialize, Serialize};

use crate::shared::sentinel::first_filled;

/// Identifier, username and status as the backend may name them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PayloadFields")]
pub struct SubmissionPayload {
    pub id: Option<String>,
    pub username: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PayloadFields {
    id: Option<String>,
    aggregator_id: Option<String>,
    buyer_id: Option<String>,
    catchment_id: Option<String>,
    acm_id: Option<String>,
    username: Option<String>,
    status: Option<String>,
}

impl From<PayloadFields> for SubmissionPayload {
    fn from(fields: PayloadFields) -> Self {
        Self {
            id: first_filled([
                fields.id,
                fields.aggregator_id,
                fields.buyer_id,
                fields.catchment_id,
                fields.acm_id,
            ]),
            username: fields.username,
            status: fields.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmissionResponse {
    Nested {
        #[serde(default)]
        success: Option<bool>,
        #[serde(default)]
        message: Option<String>,
        data: SubmissionPayload,
    },
    Flat {
        #[serde(default)]
        success: Option<bool>,
        #[serde(default)]
        message: Option<String>,
        #[serde(flatten)]
        payload: SubmissionPayload,
    },
}

/// Canonical outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub message: String,
    pub id: String,
    pub username: String,
    pub status: String,
}

/// Fallbacks used when the backend leaves a field out.
#[derive(Debug, Clone)]
pub struct ReceiptDefaults<'a> {
    pub message: &'a str,
    pub username: &'a str,
}

impl SubmissionResponse {
    pub fn success(&self) -> Option<bool> {
        match self {
            SubmissionResponse::Nested { success, .. } | SubmissionResponse::Flat { success, .. } => {
                *success
            }
        }
    }

    pub fn normalize(self, defaults: ReceiptDefaults<'_>) -> SubmissionReceipt {
        let (message, payload) = match self {
            SubmissionResponse::Nested { message, data, .. } => (message, data),
            SubmissionResponse::Flat { message, payload, .. } => (message, payload),
        };
        SubmissionReceipt {
            message: non_empty(message).unwrap_or_else(|| defaults.message.to_string()),
            id: non_empty(payload.id).unwrap_or_else(|| "Generated".to_string()),
            username: non_empty(payload.username).unwrap_or_else(|| defaults.username.to_string()),
            status: non_empty(payload.status).unwrap_or_else(|| "Pending Approval".to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: ReceiptDefaults<'static> = ReceiptDefaults {
        message: "Registration submitted.",
        username: "typed-name",
    };

    fn parse(json: &str) -> SubmissionResponse {
        serde_json::from_str(json).expect("valid payload")
    }

    #[test]
    fn test_flat_and_nested_normalize_alike() {
        let flat = parse(
            r#"{"message":"ok","aggregator_id":"AGG-1","username":"green","status":"Pending"}"#,
        );
        let nested = parse(
            r#"{"success":true,"message":"ok","data":{"buyer_id":"AGG-1","username":"green","status":"Pending"}}"#,
        );
        assert!(matches!(nested, SubmissionResponse::Nested { .. }));
        assert_eq!(nested.success(), Some(true));
        assert_eq!(flat.normalize(DEFAULTS), nested.normalize(DEFAULTS));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let receipt = parse(r#"{"success":true}"#).normalize(DEFAULTS);
        assert_eq!(
            receipt,
            SubmissionReceipt {
                message: "Registration submitted.".into(),
                id: "Generated".into(),
                username: "typed-name".into(),
                status: "Pending Approval".into(),
            }
        );
    }

    #[test]
    fn test_catchment_id_alias() {
        let receipt = parse(r#"{"success":true,"catchment_id":"ACM-7"}"#).normalize(DEFAULTS);
        assert_eq!(receipt.id, "ACM-7");
        let receipt = parse(r#"{"success":true,"acm_id":"ACM-8"}"#).normalize(DEFAULTS);
        assert_eq!(receipt.id, "ACM-8");
    }

    #[test]
    fn test_several_id_spellings() {
        let receipt =
            parse(r#"{"success":true,"aggregator_id":"AGG-4","catchment_id":"ACM-9"}"#).normalize(DEFAULTS);
        assert_eq!(receipt.id, "AGG-4");
    }
}
