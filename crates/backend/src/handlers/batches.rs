use axum::{
    extract::{Path, State},
    Json,
};
use contracts::domain::batches::{BatchesResponse, CancelBatchResponse, TraceabilityResponse};

use crate::shared::error::AppError;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/batches/:aggregator_id
pub async fn list_for_aggregator(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(aggregator_id): Path<String>,
) -> Result<Json<BatchesResponse>, AppError> {
    user.ensure_can_view(&aggregator_id)?;
    let batches = state.store.read().await.batches_of(&aggregator_id);
    Ok(Json(BatchesResponse {
        success: true,
        count: batches.len(),
        batches,
    }))
}

/// DELETE /api/batches/:batch_id
pub async fn cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(batch_id): Path<String>,
) -> Result<Json<CancelBatchResponse>, AppError> {
    let mut store = state.store.write().await;
    let owner = store
        .batch_owner(&batch_id)
        .ok_or_else(|| AppError::NotFound(format!("Batch {} not found", batch_id)))?
        .to_string();
    user.ensure_can_view(&owner)?;
    let batch = store.cancel_batch(&batch_id)?;
    tracing::info!("Batch {} of {} cancelled by {}", batch.batch_id, owner, user.0.username);
    Ok(Json(CancelBatchResponse {
        success: true,
        message: Some(batch.cancelled_message()),
    }))
}

/// GET /api/traceability/:batch_id
pub async fn traceability(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(batch_id): Path<String>,
) -> Result<Json<TraceabilityResponse>, AppError> {
    let store = state.store.read().await;
    let owner = store
        .batch_owner(&batch_id)
        .ok_or_else(|| AppError::NotFound(format!("Batch {} not found", batch_id)))?;
    user.ensure_can_view(owner)?;
    Ok(Json(store.traceability(&batch_id)?))
}
