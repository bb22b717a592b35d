use contracts::domain::approvals::ApplicantKind;
use contracts::domain::registration::{
    register_path, registration_receipt, AvailabilityField, AvailabilityResponse, RegistrationForm,
};
use contracts::shared::api_error::{ApiError, ErrorBody};
use contracts::shared::submission::{SubmissionReceipt, SubmissionResponse};
use web_sys::File;

use crate::shared::api_utils::{form_data, ApiClient};

const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

pub async fn check_availability(
    api: &ApiClient,
    kind: ApplicantKind,
    field: AvailabilityField,
    value: &str,
) -> Result<AvailabilityResponse, ApiError> {
    api.get_json(&field.path(kind, value)).await
}

/// Submits the registration with its documents.
///
/// `files` pairs each document form key with the chosen file.
pub async fn register(
    api: &ApiClient,
    kind: ApplicantKind,
    form: &RegistrationForm,
    files: Vec<(&'static str, File)>,
) -> Result<SubmissionReceipt, ApiError> {
    let data = form_data(&form.to_form_fields(kind))?;
    for (key, file) in &files {
        data.append_with_blob_and_filename(key, file, &file.name())
            .map_err(|e| ApiError::Network(format!("{:?}", e)))?;
    }

    let response = api.post_form(&register_path(kind), data).await?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    if !response.ok() {
        let detail = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(ErrorBody::into_text)
            .unwrap_or_else(|| REGISTRATION_FAILED.to_string());
        return Err(ApiError::Status { status, detail });
    }

    let parsed: SubmissionResponse =
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?;
    if parsed.success() == Some(false) {
        let detail = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(ErrorBody::into_text)
            .unwrap_or_else(|| REGISTRATION_FAILED.to_string());
        return Err(ApiError::Status { status, detail });
    }
    Ok(registration_receipt(kind, parsed, form.username.trim()))
}
