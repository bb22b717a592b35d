//! In-memory portal state shared by all handlers.

pub mod reference;
pub mod seed;

use chrono::{DateTime, Utc};
use contracts::domain::approvals::{
    ApplicantDocuments, ApplicantKind, HistoryRecord, PendingApplicant, ReviewAction,
    ReviewOutcome,
};
use contracts::domain::batches::{Batch, TraceEvent, TraceFarmer, TraceabilityResponse};
use contracts::domain::catchment::{CatchmentRecord, DashboardSummary, FarmerRecord};
use contracts::domain::demographics::Crop;
use contracts::domain::registration::RegistrationForm;
use contracts::enums::{ApplicationStatus, UserRole};
use contracts::system::auth::SessionUser;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type SharedStore = Arc<RwLock<Store>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{} not found", .kind.display_name())]
    ApplicantNotFound { kind: ApplicantKind },
    #[error("{} application has already been {}", .kind.display_name(), .status.display_name().to_lowercase())]
    AlreadyReviewed {
        kind: ApplicantKind,
        status: ApplicationStatus,
    },
    #[error("Email already registered")]
    EmailTaken,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Catchment request already exists for this Village + Crop + Season + Period.")]
    DuplicateCatchment,
    #[error("Batch {0} not found")]
    BatchNotFound(String),
    #[error("Crop {0} already exists")]
    CropExists(String),
    #[error("Crop {0} not found")]
    CropNotFound(String),
}

pub fn role_of(kind: ApplicantKind) -> UserRole {
    match kind {
        ApplicantKind::Aggregator => UserRole::Aggregator,
        ApplicantKind::Buyer => UserRole::Buyer,
    }
}

/// Portal user, admin or applicant.
#[derive(Debug, Clone)]
pub struct Account {
    pub user_id: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub org_name: String,
    pub org_type: String,
    pub email: String,
    pub mobile: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub spoc_name: Option<String>,
    pub spoc_mobile: Option<String>,
    pub status: ApplicationStatus,
    pub documents: ApplicantDocuments,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn kind(&self) -> Option<ApplicantKind> {
        match self.role {
            UserRole::Aggregator => Some(ApplicantKind::Aggregator),
            UserRole::Buyer => Some(ApplicantKind::Buyer),
            UserRole::Admin => None,
        }
    }

    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
            org_name: Some(self.org_name.clone()),
            role: self.role.slug().to_string(),
            user_role: self.role,
            email: Some(self.email.clone()),
            phone: self.phone.clone().or_else(|| Some(self.mobile.clone())),
            status: self.status,
        }
    }

    fn pending_applicant(&self) -> PendingApplicant {
        PendingApplicant {
            user_id: self.user_id.clone(),
            org_name: self.org_name.clone(),
            org_type: self.org_type.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            username: Some(self.username.clone()),
            created_at: Some(self.created_at.to_rfc3339()),
            documents: self.documents.clone(),
        }
    }

    fn history_record(&self) -> Option<HistoryRecord> {
        let status = match self.status {
            ApplicationStatus::Approved => ReviewOutcome::Approved,
            ApplicationStatus::Rejected => ReviewOutcome::Rejected,
            ApplicationStatus::Pending => return None,
        };
        Some(HistoryRecord {
            kind: self.kind()?,
            user_id: self.user_id.clone(),
            org_name: self.org_name.clone(),
            org_type: self.org_type.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            documents: self.documents.clone(),
            status,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CatchmentEntry {
    pub aggregator_id: String,
    pub village_id: String,
    pub crop_id: String,
    pub record: CatchmentRecord,
}

#[derive(Debug, Clone)]
pub struct FarmerEntry {
    pub aggregator_id: String,
    pub record: FarmerRecord,
}

/// Batch with the supply-chain data behind its traceability page.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub aggregator_id: String,
    pub batch: Batch,
    pub season: Option<String>,
    pub period: Option<String>,
    pub farmers: Vec<TraceFarmer>,
    pub events: Vec<TraceEvent>,
}

#[derive(Debug, Default)]
pub struct Store {
    accounts: Vec<Account>,
    catchments: Vec<CatchmentEntry>,
    farmers: Vec<FarmerEntry>,
    batches: Vec<BatchEntry>,
    crops: Vec<Crop>,
    next_catchment: u64,
}

impl Store {
    pub fn new(
        accounts: Vec<Account>,
        catchments: Vec<CatchmentEntry>,
        farmers: Vec<FarmerEntry>,
        batches: Vec<BatchEntry>,
    ) -> Self {
        let next_catchment = catchments.len() as u64 + 1001;
        Self {
            accounts,
            catchments,
            farmers,
            batches,
            crops: reference::REFERENCE.crops.clone(),
            next_catchment,
        }
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    pub fn find_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }

    pub fn find(&self, user_id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.user_id == user_id)
    }

    /// Applications of `kind` awaiting review, oldest first.
    pub fn pending(&self, kind: ApplicantKind) -> Vec<PendingApplicant> {
        let mut pending: Vec<&Account> = self
            .accounts
            .iter()
            .filter(|a| a.kind() == Some(kind) && a.status == ApplicationStatus::Pending)
            .collect();
        pending.sort_by_key(|a| a.created_at);
        pending.into_iter().map(Account::pending_applicant).collect()
    }

    /// Reviewed applications of both kinds, most recent review first.
    pub fn history(&self) -> Vec<HistoryRecord> {
        let mut reviewed: Vec<&Account> = self
            .accounts
            .iter()
            .filter(|a| a.reviewed_at.is_some())
            .collect();
        reviewed.sort_by(|a, b| b.reviewed_at.cmp(&a.reviewed_at));
        reviewed
            .into_iter()
            .filter_map(Account::history_record)
            .collect()
    }

    pub fn review(
        &mut self,
        action: ReviewAction,
        kind: ApplicantKind,
        user_id: &str,
    ) -> Result<&Account, StoreError> {
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.user_id == user_id && a.kind() == Some(kind))
            .ok_or(StoreError::ApplicantNotFound { kind })?;
        if account.status != ApplicationStatus::Pending {
            return Err(StoreError::AlreadyReviewed {
                kind,
                status: account.status,
            });
        }
        account.status = match action.outcome() {
            ReviewOutcome::Approved => ApplicationStatus::Approved,
            ReviewOutcome::Rejected => ApplicationStatus::Rejected,
        };
        account.reviewed_at = Some(Utc::now());
        Ok(account)
    }

    /// Emails are unique per registration flow.
    pub fn email_available(&self, kind: ApplicantKind, email: &str) -> bool {
        !self
            .accounts
            .iter()
            .any(|a| a.kind() == Some(kind) && a.email.eq_ignore_ascii_case(email.trim()))
    }

    /// Usernames are unique across the portal since they are the login.
    pub fn username_available(&self, username: &str) -> bool {
        self.find_by_username(username.trim()).is_none()
    }

    /// Next id of the flow: prefix plus one past the highest number in use.
    fn next_user_id(&self, kind: ApplicantKind) -> String {
        let prefix = match kind {
            ApplicantKind::Aggregator => "AGG-",
            ApplicantKind::Buyer => "BUY-",
        };
        let highest = self
            .accounts
            .iter()
            .filter_map(|a| a.user_id.strip_prefix(prefix)?.parse::<u64>().ok())
            .max()
            .unwrap_or(1_000_000);
        format!("{}{}", prefix, highest + 1)
    }

    /// Creates a pending application. Documents are attached afterwards.
    pub fn register(
        &mut self,
        kind: ApplicantKind,
        form: &RegistrationForm,
        password_hash: String,
    ) -> Result<&Account, StoreError> {
        if !self.email_available(kind, &form.email) {
            return Err(StoreError::EmailTaken);
        }
        if !self.username_available(&form.username) {
            return Err(StoreError::UsernameTaken);
        }
        let optional = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        let account = Account {
            user_id: self.next_user_id(kind),
            username: form.username.trim().to_string(),
            password_hash,
            role: role_of(kind),
            org_name: form.org_name.trim().to_string(),
            org_type: form.org_type.trim().to_string(),
            email: form.email.trim().to_string(),
            mobile: form.mobile.trim().to_string(),
            phone: optional(&form.phone),
            address: optional(&form.address),
            spoc_name: optional(&form.spoc_name),
            spoc_mobile: optional(&form.spoc_mobile),
            status: ApplicationStatus::Pending,
            documents: ApplicantDocuments::default(),
            created_at: Utc::now(),
            reviewed_at: None,
        };
        self.accounts.push(account);
        let index = self.accounts.len() - 1;
        Ok(&self.accounts[index])
    }

    pub fn attach_documents(&mut self, user_id: &str, documents: ApplicantDocuments) {
        if let Some(account) = self.accounts.iter_mut().find(|a| a.user_id == user_id) {
            account.documents = documents;
        }
    }

    // ------------------------------------------------------------------
    // Catchment areas
    // ------------------------------------------------------------------

    /// Stores a new pending request and returns its id. Rejected requests do
    /// not block a new one for the same village, crop, season and period.
    pub fn add_catchment(
        &mut self,
        aggregator_id: &str,
        village_id: &str,
        crop_id: &str,
        mut record: CatchmentRecord,
    ) -> Result<String, StoreError> {
        let duplicate = self.catchments.iter().any(|c| {
            c.aggregator_id == aggregator_id
                && c.village_id == village_id
                && c.crop_id == crop_id
                && c.record.season == record.season
                && c.record.period == record.period
                && c.record.status != ApplicationStatus::Rejected
        });
        if duplicate {
            return Err(StoreError::DuplicateCatchment);
        }

        let id = format!("ACM-{}", self.next_catchment);
        self.next_catchment += 1;
        record.id = Some(id.clone());
        record.aggregator_id = Some(aggregator_id.to_string());
        record.status = ApplicationStatus::Pending;
        record.created_at = Some(Utc::now().to_rfc3339());
        self.catchments.push(CatchmentEntry {
            aggregator_id: aggregator_id.to_string(),
            village_id: village_id.to_string(),
            crop_id: crop_id.to_string(),
            record,
        });
        Ok(id)
    }

    /// Requests of one aggregator, newest first.
    pub fn catchments_of(&self, aggregator_id: &str) -> Vec<CatchmentRecord> {
        self.catchments
            .iter()
            .rev()
            .filter(|c| c.aggregator_id == aggregator_id)
            .map(|c| c.record.clone())
            .collect()
    }

    pub fn farmers_of(&self, aggregator_id: &str) -> Vec<FarmerRecord> {
        self.farmers
            .iter()
            .filter(|f| f.aggregator_id == aggregator_id)
            .map(|f| f.record.clone())
            .collect()
    }

    pub fn summary(&self, aggregator_id: &str) -> DashboardSummary {
        let approved_catchments = self
            .catchments
            .iter()
            .filter(|c| {
                c.aggregator_id == aggregator_id && c.record.status == ApplicationStatus::Approved
            })
            .count();
        let approved_farmers = self
            .farmers
            .iter()
            .filter(|f| {
                f.aggregator_id == aggregator_id && f.record.status == ApplicationStatus::Approved
            })
            .count();
        let total_batches = self
            .batches
            .iter()
            .filter(|b| b.aggregator_id == aggregator_id)
            .count();
        DashboardSummary {
            success: true,
            approved_catchments: approved_catchments as u32,
            approved_farmers: approved_farmers as u32,
            total_batches: total_batches as u32,
        }
    }

    // ------------------------------------------------------------------
    // Batches
    // ------------------------------------------------------------------

    pub fn batches_of(&self, aggregator_id: &str) -> Vec<Batch> {
        self.batches
            .iter()
            .filter(|b| b.aggregator_id == aggregator_id)
            .map(|b| b.batch.clone())
            .collect()
    }

    pub fn batch_owner(&self, batch_id: &str) -> Option<&str> {
        self.batches
            .iter()
            .find(|b| b.batch.batch_id == batch_id)
            .map(|b| b.aggregator_id.as_str())
    }

    /// Drops a batch together with its traceability data.
    pub fn cancel_batch(&mut self, batch_id: &str) -> Result<Batch, StoreError> {
        let index = self
            .batches
            .iter()
            .position(|b| b.batch.batch_id == batch_id)
            .ok_or_else(|| StoreError::BatchNotFound(batch_id.to_string()))?;
        Ok(self.batches.remove(index).batch)
    }

    pub fn traceability(&self, batch_id: &str) -> Result<TraceabilityResponse, StoreError> {
        let entry = self
            .batches
            .iter()
            .find(|b| b.batch.batch_id == batch_id)
            .ok_or_else(|| StoreError::BatchNotFound(batch_id.to_string()))?;
        Ok(TraceabilityResponse {
            success: true,
            batch: entry.batch.clone(),
            season: entry.season.clone(),
            period: entry.period.clone(),
            farmers: entry.farmers.clone(),
            events: entry.events.clone(),
        })
    }

    // ------------------------------------------------------------------
    // Crop master
    // ------------------------------------------------------------------

    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }

    pub fn crop(&self, crop_id: &str) -> Option<&Crop> {
        self.crops.iter().find(|c| c.crop_id == crop_id)
    }

    /// Crop ids are the key of the catchment crop field, so they stay unique.
    pub fn add_crop(&mut self, crop: Crop) -> Result<(), StoreError> {
        if self.crop(&crop.crop_id).is_some() {
            return Err(StoreError::CropExists(crop.crop_id));
        }
        self.crops.push(crop);
        Ok(())
    }

    pub fn remove_crop(&mut self, crop_id: &str) -> Result<Crop, StoreError> {
        let index = self
            .crops
            .iter()
            .position(|c| c.crop_id == crop_id)
            .ok_or_else(|| StoreError::CropNotFound(crop_id.to_string()))?;
        Ok(self.crops.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Store {
        seed::demo_store("admin-hash".into(), "member-hash".into()).unwrap()
    }

    fn form(email: &str, username: &str) -> RegistrationForm {
        RegistrationForm {
            org_name: "Harvest Hub".into(),
            org_type: "FPO".into(),
            email: email.into(),
            mobile: "9876500000".into(),
            spoc_mobile: "9876500001".into(),
            username: username.into(),
            password: "secret123".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_pending_lists_per_kind() {
        let store = store();
        let aggregators: Vec<String> = store
            .pending(ApplicantKind::Aggregator)
            .into_iter()
            .map(|a| a.user_id)
            .collect();
        assert_eq!(aggregators, vec!["AGG-2619284", "AGG-2619285"]);
        assert_eq!(store.pending(ApplicantKind::Buyer).len(), 1);
        assert_eq!(store.history().len(), 3);
    }

    #[test]
    fn test_review_moves_application_to_history() {
        let mut store = store();
        let account = store
            .review(ReviewAction::Approve, ApplicantKind::Aggregator, "AGG-2619284")
            .unwrap();
        assert_eq!(account.status, ApplicationStatus::Approved);

        assert_eq!(store.pending(ApplicantKind::Aggregator).len(), 1);
        let history = store.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].user_id, "AGG-2619284");
        assert_eq!(history[0].status, ReviewOutcome::Approved);
    }

    #[test]
    fn test_review_errors() {
        let mut store = store();
        assert_eq!(
            store
                .review(ReviewAction::Reject, ApplicantKind::Buyer, "AGG-2619284")
                .unwrap_err(),
            StoreError::ApplicantNotFound {
                kind: ApplicantKind::Buyer
            }
        );
        let err = store
            .review(ReviewAction::Reject, ApplicantKind::Aggregator, "AGG-2619283")
            .unwrap_err();
        assert_eq!(err.to_string(), "Aggregator application has already been approved");
    }

    #[test]
    fn test_register_assigns_next_id_and_enforces_uniqueness() {
        let mut store = store();
        assert!(!store.email_available(ApplicantKind::Aggregator, "CONTACT@greenearthfpo.org"));
        assert!(store.email_available(ApplicantKind::Buyer, "contact@greenearthfpo.org"));
        assert!(!store.username_available("greenearth"));

        let account = store
            .register(ApplicantKind::Aggregator, &form("new@hub.org", "harvesthub"), "h".into())
            .unwrap();
        assert_eq!(account.user_id, "AGG-2619286");
        assert_eq!(account.status, ApplicationStatus::Pending);
        assert!(account.phone.is_none());

        let buyer = store
            .register(ApplicantKind::Buyer, &form("shop@hub.org", "hubshop"), "h".into())
            .unwrap();
        assert_eq!(buyer.user_id, "BUY-3719002");

        assert_eq!(
            store
                .register(ApplicantKind::Aggregator, &form("new@hub.org", "other"), "h".into())
                .unwrap_err(),
            StoreError::EmailTaken
        );
        assert_eq!(
            store
                .register(ApplicantKind::Buyer, &form("x@hub.org", "harvesthub"), "h".into())
                .unwrap_err(),
            StoreError::UsernameTaken
        );
        assert_eq!(store.pending(ApplicantKind::Aggregator).len(), 3);
    }

    #[test]
    fn test_catchment_duplicates_are_rejected() {
        let mut store = store();
        let record = |season: &str| CatchmentRecord {
            village_name: Some("Bukkapatnam Village".into()),
            crop_name: Some("Paddy".into()),
            season: Some(season.into()),
            period: Some("2025-26".into()),
            ..Default::default()
        };
        let id = store
            .add_catchment("AGG-2619283", "V002", "C004", record("Kharif"))
            .unwrap();
        assert!(id.starts_with("ACM-"));
        assert_eq!(
            store.add_catchment("AGG-2619283", "V002", "C004", record("Kharif")),
            Err(StoreError::DuplicateCatchment)
        );
        assert!(store
            .add_catchment("AGG-2619283", "V002", "C004", record("Rabi"))
            .is_ok());

        let mine = store.catchments_of("AGG-2619283");
        assert_eq!(mine.len(), 5);
        assert_eq!(mine[0].season.as_deref(), Some("Rabi"));
        assert_eq!(mine[0].status, ApplicationStatus::Pending);
    }

    #[test]
    fn test_dashboard_summary_counts_approved() {
        let store = store();
        let summary = store.summary("AGG-2619283");
        assert_eq!(summary.approved_catchments, 2);
        assert_eq!(summary.approved_farmers, 5);
        assert_eq!(summary.total_batches, 2);

        let nobody = store.summary("AGG-0000000");
        assert_eq!(
            (nobody.approved_catchments, nobody.approved_farmers, nobody.total_batches),
            (0, 0, 0)
        );
    }

    #[test]
    fn test_traceability() {
        let store = store();
        let trace = store.traceability("BATCH-2619283-001").unwrap();
        assert_eq!(trace.batch.total_quantity(), 235.5);
        assert_eq!(trace.farmers.len(), 2);
        assert!(!trace.events.is_empty());
        assert_eq!(store.batch_owner("BATCH-2619283-002"), Some("AGG-2619283"));
        assert_eq!(
            store.traceability("BATCH-X").unwrap_err(),
            StoreError::BatchNotFound("BATCH-X".into())
        );
    }

    #[test]
    fn test_cancel_batch() {
        let mut store = store();
        let batch = store.cancel_batch("BATCH-2619283-001").unwrap();
        assert_eq!(batch.batch_id, "BATCH-2619283-001");
        assert_eq!(store.batches_of("AGG-2619283").len(), 1);
        assert_eq!(store.summary("AGG-2619283").total_batches, 1);
        assert!(store.batch_owner("BATCH-2619283-001").is_none());
        assert_eq!(
            store.cancel_batch("BATCH-2619283-001").unwrap_err(),
            StoreError::BatchNotFound("BATCH-2619283-001".into())
        );
    }

    #[test]
    fn test_crop_master() {
        let mut store = store();
        let seeded = store.crops().len();
        let crop = Crop {
            crop_id: "C006".into(),
            crop_name: Some("SUNFLOWER".into()),
            ..Default::default()
        };
        store.add_crop(crop.clone()).unwrap();
        assert_eq!(store.crops().len(), seeded + 1);
        assert_eq!(
            store.add_crop(crop).unwrap_err(),
            StoreError::CropExists("C006".into())
        );

        let removed = store.remove_crop("C001").unwrap();
        assert_eq!(removed.crop_name.as_deref(), Some("Groundnut"));
        assert!(store.crop("C001").is_none());
        assert_eq!(
            store.remove_crop("C001").unwrap_err().to_string(),
            "Crop C001 not found"
        );
    }
}
