use contracts::domain::batches::{
    Batch, BatchesResponse, CancelBatchResponse, TraceabilityResponse,
};
use contracts::domain::demographics::encode_segment;
use contracts::shared::api_error::ApiError;

use crate::shared::api_utils::ApiClient;

pub async fn fetch_batches(api: &ApiClient, aggregator_id: &str) -> Result<Vec<Batch>, ApiError> {
    api.get_json::<BatchesResponse>(&format!("/api/batches/{}", encode_segment(aggregator_id)))
        .await
        .map(|r| r.batches)
}

pub async fn fetch_traceability(api: &ApiClient, batch_id: &str) -> Result<TraceabilityResponse, ApiError> {
    api.get_json(&format!("/api/traceability/{}", encode_segment(batch_id)))
        .await
}

/// Cancels a batch; returns the confirmation text.
pub async fn cancel_batch(api: &ApiClient, batch: &Batch) -> Result<String, ApiError> {
    api.delete_json::<CancelBatchResponse>(&format!(
        "/api/batches/{}",
        encode_segment(&batch.batch_id)
    ))
    .await
    .map(|r| r.message.unwrap_or_else(|| batch.cancelled_message()))
}
