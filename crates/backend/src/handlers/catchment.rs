use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::domain::catchment::{
    CatchmentRecord, CatchmentSubmitResponse, DashboardSummary, FarmersResponse,
    MyRequestsResponse,
};
use contracts::enums::UserRole;
use contracts::shared::sentinel::NA;

use crate::shared::error::AppError;
use crate::shared::form::FormFields;
use crate::shared::state::AppState;
use crate::store::{Store, StoreError};
use crate::system::auth::extractor::CurrentUser;

/// Fields a request cannot go without, with their labels.
const REQUIRED_FIELDS: [(&str, &str); 7] = [
    ("district_id", "District"),
    ("mandal_id", "Mandal"),
    ("panchayat_id", "Panchayat"),
    ("village_id", "Village"),
    ("crop_id", "Crop"),
    ("season", "Season"),
    ("period", "Period"),
];

/// Validated request body.
#[derive(Debug)]
struct NewCatchment {
    village_id: String,
    crop_id: String,
    record: CatchmentRecord,
}

fn is_set(value: &str) -> bool {
    !value.is_empty() && value != NA
}

fn parse_request(form: &FormFields, store: &Store) -> Result<NewCatchment, String> {
    if let Some((_, label)) = REQUIRED_FIELDS
        .iter()
        .find(|(key, _)| !is_set(&form.text(key)))
    {
        return Err(format!("{} is required", label));
    }

    let crop_id = form.text("crop_id");
    let crop = store
        .crop(&crop_id)
        .ok_or_else(|| format!("Unknown crop: {}", crop_id))?;

    // labels fall back to the id when the client sent none
    let name = |prefix: &str| {
        let label = form.text(&format!("{}_name", prefix));
        if is_set(&label) {
            Some(label)
        } else {
            Some(form.text(&format!("{}_id", prefix)))
        }
    };

    let record = CatchmentRecord {
        district_name: name("district"),
        mandal_name: name("mandal"),
        panchayat_name: name("panchayat"),
        village_name: name("village"),
        crop_name: crop.crop_name.clone().or_else(|| name("crop")),
        season: Some(form.text("season")),
        period: Some(form.text("period")),
        ..Default::default()
    };
    Ok(NewCatchment {
        village_id: form.text("village_id"),
        crop_id,
        record,
    })
}

fn rejection(status: StatusCode, error: &str, message: String) -> Response {
    let body = CatchmentSubmitResponse {
        success: false,
        catchment_id: None,
        message: Some(message),
        error: Some(error.to_string()),
    };
    (status, Json(body)).into_response()
}

/// POST /api/catchment/request
pub async fn submit_request(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    form: FormFields,
) -> Response {
    if claims.user_role != UserRole::Aggregator.code() {
        return rejection(
            StatusCode::FORBIDDEN,
            "forbidden",
            "Only aggregators can submit catchment requests".to_string(),
        );
    }

    let mut store = state.store.write().await;
    let request = match parse_request(&form, &store) {
        Ok(request) => request,
        Err(message) => return rejection(StatusCode::UNPROCESSABLE_ENTITY, "validation", message),
    };

    let added = store.add_catchment(
        &claims.sub,
        &request.village_id,
        &request.crop_id,
        request.record,
    );
    match added {
        Ok(catchment_id) => {
            tracing::info!("Catchment request {} from {}", catchment_id, claims.sub);
            Json(CatchmentSubmitResponse {
                success: true,
                catchment_id: Some(catchment_id),
                message: Some("Catchment request submitted successfully".to_string()),
                error: None,
            })
            .into_response()
        }
        Err(err @ StoreError::DuplicateCatchment) => {
            rejection(StatusCode::CONFLICT, "duplicate", err.to_string())
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

/// GET /api/catchment/my-requests/:aggregator_id
pub async fn my_requests(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(aggregator_id): Path<String>,
) -> Result<Json<MyRequestsResponse>, AppError> {
    user.ensure_can_view(&aggregator_id)?;
    let requests = state.store.read().await.catchments_of(&aggregator_id);
    Ok(Json(MyRequestsResponse {
        success: true,
        count: requests.len(),
        requests,
    }))
}

/// GET /api/catchment/farmers/:aggregator_id
pub async fn farmers(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(aggregator_id): Path<String>,
) -> Result<Json<FarmersResponse>, AppError> {
    user.ensure_can_view(&aggregator_id)?;
    let farmers = state.store.read().await.farmers_of(&aggregator_id);
    Ok(Json(FarmersResponse {
        success: true,
        count: farmers.len(),
        farmers,
    }))
}

/// GET /api/catchment/dashboard/summary/:aggregator_id
pub async fn dashboard_summary(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(aggregator_id): Path<String>,
) -> Result<Json<DashboardSummary>, AppError> {
    user.ensure_can_view(&aggregator_id)?;
    Ok(Json(state.store.read().await.summary(&aggregator_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    fn demo() -> Store {
        seed::demo_store("admin-hash".into(), "member-hash".into()).unwrap()
    }

    fn complete_form() -> Vec<(&'static str, &'static str)> {
        vec![
            ("district_id", "D001"),
            ("district_name", "Anantapur"),
            ("mandal_id", "M001"),
            ("mandal_name", ""),
            ("panchayat_id", "P001"),
            ("panchayat_name", "NA"),
            ("village_id", "V001"),
            ("village_name", "Kalyandurg"),
            ("vo_id", "NA"),
            ("vo_name", "NA"),
            ("crop_id", "C001"),
            ("crop_name", "Groundnut"),
            ("season", "Kharif"),
            ("period", "2025-26"),
        ]
    }

    #[test]
    fn test_parse_complete_request() {
        let request = parse_request(&FormFields::from_pairs(complete_form()), &demo()).unwrap();
        assert_eq!(request.village_id, "V001");
        assert_eq!(request.crop_id, "C001");
        assert_eq!(request.record.district_name.as_deref(), Some("Anantapur"));
        assert_eq!(request.record.mandal_name.as_deref(), Some("M001"));
        assert_eq!(request.record.panchayat_name.as_deref(), Some("P001"));
        assert_eq!(request.record.period.as_deref(), Some("2025-26"));
    }

    #[test]
    fn test_sentinel_counts_as_missing() {
        let mut pairs = complete_form();
        for pair in pairs.iter_mut() {
            if pair.0 == "village_id" {
                pair.1 = "NA";
            }
        }
        let err = parse_request(&FormFields::from_pairs(pairs), &demo()).unwrap_err();
        assert_eq!(err, "Village is required");
    }

    #[test]
    fn test_unknown_crop_is_rejected() {
        let mut pairs = complete_form();
        pairs.retain(|(k, _)| *k != "crop_id");
        pairs.push(("crop_id", "C999"));
        let err = parse_request(&FormFields::from_pairs(pairs), &demo()).unwrap_err();
        assert!(err.contains("C999"));
    }
}
