use axum::{
    extract::{Path, State},
    Json,
};
use contracts::domain::approvals::{
    ActionResponse, ApplicantKind, ApplicationHistoryResponse, PendingAggregatorsResponse,
    PendingBuyersResponse, ReviewAction,
};

use crate::shared::error::AppError;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// GET /admin/pending_aggregators
pub async fn pending_aggregators(State(state): State<AppState>) -> Json<PendingAggregatorsResponse> {
    let aggregators = state.store.read().await.pending(ApplicantKind::Aggregator);
    Json(PendingAggregatorsResponse {
        count: aggregators.len(),
        aggregators,
    })
}

/// GET /admin/pending_buyers
pub async fn pending_buyers(State(state): State<AppState>) -> Json<PendingBuyersResponse> {
    let buyers = state.store.read().await.pending(ApplicantKind::Buyer);
    Json(PendingBuyersResponse {
        count: buyers.len(),
        buyers,
    })
}

/// GET /admin/application_history
pub async fn application_history(
    State(state): State<AppState>,
) -> Json<ApplicationHistoryResponse> {
    let history = state.store.read().await.history();
    Json(ApplicationHistoryResponse {
        count: history.len(),
        history,
    })
}

/// `approve_aggregator` -> (Approve, Aggregator)
fn parse_review(segment: &str) -> Option<(ReviewAction, ApplicantKind)> {
    let (action, kind) = segment.split_once('_')?;
    let action = match action {
        "approve" => ReviewAction::Approve,
        "reject" => ReviewAction::Reject,
        _ => return None,
    };
    Some((action, ApplicantKind::from_slug(kind)?))
}

/// PUT /admin/{approve|reject}_{aggregator|buyer}/:user_id
pub async fn review(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Path((segment, user_id)): Path<(String, String)>,
) -> Result<Json<ActionResponse>, AppError> {
    let (action, kind) = parse_review(&segment)
        .ok_or_else(|| AppError::NotFound(format!("Unknown review action: {}", segment)))?;

    let mut store = state.store.write().await;
    let account = store.review(action, kind, &user_id)?;
    let verdict = action.outcome().display_name().to_lowercase();
    tracing::info!(
        "{} {} {} by {}",
        kind.display_name(),
        account.user_id,
        verdict,
        admin.username
    );

    Ok(Json(ActionResponse {
        message: format!(
            "{} {} has been {} successfully",
            kind.display_name(),
            account.org_name,
            verdict
        ),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_review() {
        assert_eq!(
            parse_review("approve_aggregator"),
            Some((ReviewAction::Approve, ApplicantKind::Aggregator))
        );
        assert_eq!(
            parse_review("reject_buyer"),
            Some((ReviewAction::Reject, ApplicantKind::Buyer))
        );
        assert_eq!(parse_review("approve_admin"), None);
        assert_eq!(parse_review("delete_buyer"), None);
        assert_eq!(parse_review("approve"), None);
    }
}
