use contracts::domain::approvals::{
    ActionResponse, ApplicantKind, ApplicationHistoryResponse, ApprovalRow,
    PendingAggregatorsResponse, PendingBuyersResponse, ReviewAction,
};
use contracts::shared::api_error::ApiError;
use contracts::shared::pagination::TableId;

use crate::shared::api_utils::ApiClient;

/// Rows of one admin table.
pub async fn fetch_table(api: &ApiClient, table: TableId) -> Result<Vec<ApprovalRow>, ApiError> {
    match table {
        TableId::Aggregators => api
            .get_json::<PendingAggregatorsResponse>("/admin/pending_aggregators")
            .await
            .map(PendingAggregatorsResponse::into_rows),
        TableId::Buyers => api
            .get_json::<PendingBuyersResponse>("/admin/pending_buyers")
            .await
            .map(PendingBuyersResponse::into_rows),
        TableId::History => api
            .get_json::<ApplicationHistoryResponse>("/admin/application_history")
            .await
            .map(ApplicationHistoryResponse::into_rows),
    }
}

/// Approve or reject one application.
pub async fn review(
    api: &ApiClient,
    action: ReviewAction,
    kind: ApplicantKind,
    user_id: &str,
) -> Result<ActionResponse, ApiError> {
    api.put_json(&action.path(kind, user_id)).await
}
