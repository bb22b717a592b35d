use contracts::domain::catchment::{
    CatchmentRecord, DashboardSummary, FarmerRecord, FarmersResponse, MyRequestsResponse,
};
use contracts::domain::demographics::encode_segment;
use contracts::shared::api_error::ApiError;

use crate::shared::api_utils::ApiClient;

pub async fn fetch_summary(api: &ApiClient, aggregator_id: &str) -> Result<DashboardSummary, ApiError> {
    api.get_json(&format!(
        "/api/catchment/dashboard/summary/{}",
        encode_segment(aggregator_id)
    ))
    .await
}

pub async fn fetch_my_requests(
    api: &ApiClient,
    aggregator_id: &str,
) -> Result<Vec<CatchmentRecord>, ApiError> {
    api.get_json::<MyRequestsResponse>(&format!(
        "/api/catchment/my-requests/{}",
        encode_segment(aggregator_id)
    ))
    .await
    .map(|r| r.requests)
}

pub async fn fetch_farmers(api: &ApiClient, aggregator_id: &str) -> Result<Vec<FarmerRecord>, ApiError> {
    api.get_json::<FarmersResponse>(&format!(
        "/api/catchment/farmers/{}",
        encode_segment(aggregator_id)
    ))
    .await
    .map(|r| r.farmers)
}
