use anyhow::Context;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use contracts::domain::approvals::{ApplicantDocuments, ApplicantKind};
use contracts::domain::registration::{
    field_name, AvailabilityResponse, RegistrationForm, DOCUMENT_FIELDS,
};
use serde_json::{json, Value};
use std::path::Path as FsPath;

use crate::shared::error::AppError;
use crate::shared::form::FormFields;
use crate::shared::state::AppState;
use crate::system::auth::password::hash_password;

const PENDING_STATUS: &str = "Pending Approval";

/// Reads the registration fields under the names the flow uses.
fn read_form(kind: ApplicantKind, form: &FormFields) -> RegistrationForm {
    let text = |name: &str| form.text(&field_name(kind, name));
    RegistrationForm {
        org_name: text("org_name"),
        org_type: text("org_type"),
        email: text("email"),
        mobile: text("mobile"),
        phone: match kind {
            ApplicantKind::Buyer => text("phone"),
            ApplicantKind::Aggregator => String::new(),
        },
        address: text("address"),
        spoc_name: text("spoc_name"),
        spoc_mobile: text("spoc_mobile"),
        username: text("user_id"),
        password: form.raw(&field_name(kind, "password")),
    }
}

/// Success body. Aggregators get the flat shape, buyers the nested one.
fn receipt_body(kind: ApplicantKind, user_id: &str, username: &str) -> Value {
    match kind {
        ApplicantKind::Aggregator => json!({
            "message": "Registration submitted successfully. Admin will review your application.",
            "aggregator_id": user_id,
            "username": username,
            "status": PENDING_STATUS,
        }),
        ApplicantKind::Buyer => json!({
            "success": true,
            "message": "Buyer registration submitted successfully. Admin will review your application.",
            "data": {
                "buyer_id": user_id,
                "username": username,
                "status": PENDING_STATUS,
            },
        }),
    }
}

/// Writes the uploaded documents under `<uploads>/<user_id>/` and returns
/// their public paths.
async fn save_documents(
    uploads_dir: &FsPath,
    user_id: &str,
    form: &FormFields,
) -> Result<ApplicantDocuments, AppError> {
    let mut documents = ApplicantDocuments::default();
    let dir = uploads_dir.join(user_id);

    for (field, _) in DOCUMENT_FIELDS {
        let Some(file) = form.file(field) else {
            continue;
        };
        let key = field.trim_end_matches("_doc");
        let stem = format!("{}_{}", key, uuid::Uuid::new_v4().simple());
        let file_name = match file.extension() {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem,
        };

        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        tokio::fs::write(dir.join(&file_name), &file.bytes)
            .await
            .with_context(|| format!("Failed to store {} for {}", field, user_id))?;

        let stored = Some(format!("uploads/{}/{}", user_id, file_name));
        match key {
            "registration" => documents.registration = stored,
            "pan" => documents.pan = stored,
            "aadhar" => documents.aadhar = stored,
            _ => {}
        }
    }
    Ok(documents)
}

/// POST /api/{aggregator|buyer}/register
pub async fn register(
    State(state): State<AppState>,
    Extension(kind): Extension<ApplicantKind>,
    form: FormFields,
) -> Result<Json<Value>, AppError> {
    let registration = read_form(kind, &form);
    registration
        .validate(kind)
        .map_err(|e| AppError::Unprocessable(e.to_string()))?;

    let password = registration.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("Password hashing task failed")??;

    let (user_id, username) = {
        let mut store = state.store.write().await;
        let account = store.register(kind, &registration, password_hash)?;
        (account.user_id.clone(), account.username.clone())
    };

    let documents = save_documents(&state.uploads_dir, &user_id, &form).await?;
    state
        .store
        .write()
        .await
        .attach_documents(&user_id, documents);

    tracing::info!(
        "New {} registration {} ({})",
        kind.slug(),
        user_id,
        registration.org_name
    );
    Ok(Json(receipt_body(kind, &user_id, &username)))
}

/// GET /api/{aggregator|buyer}/check-email/:email
pub async fn check_email(
    State(state): State<AppState>,
    Extension(kind): Extension<ApplicantKind>,
    Path(email): Path<String>,
) -> Json<AvailabilityResponse> {
    let available = state.store.read().await.email_available(kind, &email);
    Json(AvailabilityResponse { available })
}

/// GET /api/{aggregator|buyer}/check-username/:username
pub async fn check_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Json<AvailabilityResponse> {
    let available = state.store.read().await.username_available(&username);
    Json(AvailabilityResponse { available })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::registration::registration_receipt;
    use contracts::shared::submission::SubmissionResponse;

    #[test]
    fn test_buyer_fields_are_prefixed() {
        let form = FormFields::from_pairs([
            ("buyer_org_name", "Metro Mart"),
            ("buyer_org_type", "Retailer"),
            ("buyer_org_email", "ops@metromart.in"),
            ("buyer_org_mobile", "9876543210"),
            ("buyer_org_phone", "0401234567"),
            ("buyer_org_spoc_mobile", "9876500000"),
            ("buyer_org_user_id", "metromart2"),
            ("buyer_org_user_id_password", "secret123 "),
        ]);
        let parsed = read_form(ApplicantKind::Buyer, &form);
        assert_eq!(parsed.org_name, "Metro Mart");
        assert_eq!(parsed.phone, "0401234567");
        assert_eq!(parsed.username, "metromart2");
        // passwords are taken as typed
        assert_eq!(parsed.password, "secret123 ");
    }

    #[test]
    fn test_aggregator_ignores_phone() {
        let form = FormFields::from_pairs([("org_name", " Green "), ("phone", "0401234567")]);
        let parsed = read_form(ApplicantKind::Aggregator, &form);
        assert_eq!(parsed.org_name, "Green");
        assert!(parsed.phone.is_empty());
    }

    #[test]
    fn test_receipt_bodies_normalize_to_the_same_receipt() {
        for kind in [ApplicantKind::Aggregator, ApplicantKind::Buyer] {
            let body = receipt_body(kind, "X-1", "someone");
            let response: SubmissionResponse = serde_json::from_value(body).unwrap();
            let receipt = registration_receipt(kind, response, "typed");
            assert_eq!(receipt.id, "X-1");
            assert_eq!(receipt.username, "someone");
            assert_eq!(receipt.status, PENDING_STATUS);
        }
    }

    #[tokio::test]
    async fn test_documents_are_written_under_the_user_dir() {
        let root = std::env::temp_dir().join(format!("agriportal-{}", uuid::Uuid::new_v4()));
        let mut form = FormFields::default();
        form.push_file("pan_doc", "card.PDF", b"%PDF-1.4".to_vec());

        let documents = save_documents(&root, "AGG-1", &form).await.unwrap();
        let stored = documents.pan.unwrap();
        assert!(stored.starts_with("uploads/AGG-1/pan_"));
        assert!(stored.ends_with(".pdf"));
        assert!(documents.registration.is_none());

        let file_name = stored.rsplit('/').next().unwrap();
        let written = std::fs::read(root.join("AGG-1").join(file_name)).unwrap();
        assert_eq!(written, b"%PDF-1.4");
        let _ = std::fs::remove_dir_all(root);
    }
}
