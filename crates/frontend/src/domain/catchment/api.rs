use contracts::domain::catchment::{
    submission_failure_message, CatchmentField, CatchmentForm, CatchmentSubmitResponse,
};
use contracts::domain::demographics::{CropsResponse, LocationLevel, LookupResponse, SeasonsResponse};
use contracts::shared::api_error::ApiError;
use contracts::shared::selector::{FetchTicket, SelectOption};

use crate::shared::api_utils::{form_data, ApiClient};

pub async fn fetch_seasons(api: &ApiClient) -> Result<SeasonsResponse, String> {
    api.get_json("/api/demographics/seasons")
        .await
        .map_err(|e| e.to_string())
}

async fn fetch_crops(api: &ApiClient) -> Result<Vec<SelectOption>, String> {
    api.get_json::<CropsResponse>("/api/demographics/crops")
        .await
        .map_err(|e| e.to_string())?
        .into_options()
}

async fn fetch_locations(
    api: &ApiClient,
    level: LocationLevel,
    parent_id: Option<&str>,
    vo_id: Option<&str>,
) -> Result<Vec<SelectOption>, String> {
    api.get_json::<LookupResponse>(&level.lookup_path(parent_id, vo_id))
        .await
        .map_err(|e| e.to_string())?
        .into_options()
}

/// Options for the field a ticket was issued for.
pub async fn load_options(
    api: &ApiClient,
    ticket: &FetchTicket<CatchmentField>,
) -> Result<Vec<SelectOption>, String> {
    match ticket.key {
        CatchmentField::Crop => fetch_crops(api).await,
        CatchmentField::Season => fetch_seasons(api).await?.season_options(),
        CatchmentField::Period => fetch_seasons(api).await?.period_options(),
        CatchmentField::Variety => Ok(Vec::new()),
        CatchmentField::District => fetch_locations(api, LocationLevel::District, None, None).await,
        CatchmentField::Shg => {
            // SHGs hang off the village; the VO only narrows the list
            let village = ticket
                .ancestors
                .iter()
                .find(|(k, _)| *k == CatchmentField::Village)
                .map(|(_, v)| v.as_str());
            fetch_locations(api, LocationLevel::Shg, village, Some(&ticket.parent_value)).await
        }
        field => match field.location_level() {
            Some(level) => fetch_locations(api, level, Some(&ticket.parent_value), None).await,
            None => Err(format!("no lookup for {:?}", field)),
        },
    }
}

/// Sends the request; returns the new catchment id.
pub async fn submit(api: &ApiClient, form: &CatchmentForm) -> Result<String, ApiError> {
    let data = form_data(&form.to_form_fields())?;
    let response = api.post_form("/api/catchment/request", data).await?;
    let status = response.status();
    let ok = response.ok();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))?;

    if status == 401 {
        return Err(ApiError::Unauthorized);
    }
    let body: CatchmentSubmitResponse = serde_json::from_str(&text).unwrap_or_default();
    if ok && body.success {
        return Ok(body.request_id());
    }
    Err(ApiError::Status {
        status,
        detail: submission_failure_message(status, body.error.as_deref(), body.message.as_deref()),
    })
}
