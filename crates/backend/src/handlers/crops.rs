use axum::{
    extract::{Path, State},
    Json,
};
use contracts::domain::crops::{CropMasterResponse, NewCrop};

use crate::shared::error::AppError;
use crate::shared::form::FormFields;
use crate::shared::state::AppState;
use crate::store::Store;
use crate::system::auth::extractor::CurrentUser;

fn crop_list(store: &Store, message: Option<String>) -> Json<CropMasterResponse> {
    Json(CropMasterResponse {
        success: true,
        message,
        crops: store.crops().to_vec(),
    })
}

fn read_form(form: &FormFields) -> NewCrop {
    NewCrop {
        crop_name: form.text("crop_name"),
        crop_id: form.text("crop_id"),
        variety_name: form.text("variety_name"),
        variety_id: form.text("variety_id"),
    }
}

/// GET /admin/crops
pub async fn list(State(state): State<AppState>) -> Json<CropMasterResponse> {
    crop_list(&*state.store.read().await, None)
}

/// POST /admin/crops
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    form: FormFields,
) -> Result<Json<CropMasterResponse>, AppError> {
    let new_crop = read_form(&form);
    new_crop
        .validate()
        .map_err(|e| AppError::Unprocessable(e.to_string()))?;
    let crop = new_crop.into_crop();
    let message = format!(
        "Crop {} added",
        crop.crop_name.as_deref().unwrap_or(&crop.crop_id)
    );

    let crop_id = crop.crop_id.clone();

    let mut store = state.store.write().await;
    store.add_crop(crop)?;
    tracing::info!("Crop {} added by {}", crop_id, admin.username);
    Ok(crop_list(&store, Some(message)))
}

/// DELETE /admin/crops/:crop_id
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Path(crop_id): Path<String>,
) -> Result<Json<CropMasterResponse>, AppError> {
    let mut store = state.store.write().await;
    let removed = store.remove_crop(&crop_id)?;
    tracing::info!("Crop {} removed by {}", removed.crop_id, admin.username);
    let message = format!(
        "Crop {} removed",
        removed.crop_name.as_deref().unwrap_or(&removed.crop_id)
    );
    Ok(crop_list(&store, Some(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_form() {
        let form = FormFields::from_pairs(vec![
            ("crop_name", " sunflower"),
            ("crop_id", "C006"),
            ("variety_name", "KBSH-44"),
        ]);
        let crop = read_form(&form);
        assert_eq!(crop.crop_id, "C006");
        assert_eq!(crop.variety_id, "");
        assert_eq!(crop.validate().unwrap_err().to_string(), "Variety ID is required");
    }
}
