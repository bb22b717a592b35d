use contracts::domain::crops::{CropMasterResponse, NewCrop};
use contracts::domain::demographics::{encode_segment, Crop};
use contracts::shared::api_error::ApiError;

use crate::shared::api_utils::ApiClient;

pub async fn fetch_crops(api: &ApiClient) -> Result<Vec<Crop>, ApiError> {
    api.get_json::<CropMasterResponse>("/admin/crops")
        .await
        .map(|r| r.crops)
}

pub async fn add_crop(api: &ApiClient, crop: &NewCrop) -> Result<CropMasterResponse, ApiError> {
    let fields: Vec<(String, String)> = crop
        .to_form_fields()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    api.post_fields("/admin/crops", &fields).await
}

pub async fn remove_crop(api: &ApiClient, crop_id: &str) -> Result<CropMasterResponse, ApiError> {
    api.delete_json(&format!("/admin/crops/{}", encode_segment(crop_id)))
        .await
}
