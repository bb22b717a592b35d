use serde::{Deserialize, Serialize};

use crate::shared::pagination::TableId;

// ============================================================================
// Applicants
// ============================================================================

/// Which registration flow an applicant came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicantKind {
    Aggregator,
    Buyer,
}

impl ApplicantKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ApplicantKind::Aggregator => "Aggregator",
            ApplicantKind::Buyer => "Buyer",
        }
    }

    /// Path segment used by the admin endpoints (`approve_aggregator`).
    pub fn slug(&self) -> &'static str {
        match self {
            ApplicantKind::Aggregator => "aggregator",
            ApplicantKind::Buyer => "buyer",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.to_ascii_lowercase().as_str() {
            "aggregator" => Some(ApplicantKind::Aggregator),
            "buyer" => Some(ApplicantKind::Buyer),
            _ => None,
        }
    }
}

/// Uploaded document paths as stored by the backend. Missing documents are
/// `null` or empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantDocuments {
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default)]
    pub pan: Option<String>,
    #[serde(default)]
    pub aadhar: Option<String>,
}

/// Application awaiting admin review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingApplicant {
    pub user_id: String,
    pub org_name: String,
    /// Organisation type (FPO, Trader, ...)
    #[serde(rename = "type", default)]
    pub org_type: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub documents: ApplicantDocuments,
}

/// Outcome shown in the history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewOutcome {
    Approved,
    Rejected,
}

impl ReviewOutcome {
    pub fn display_name(&self) -> &'static str {
        match self {
            ReviewOutcome::Approved => "Approved",
            ReviewOutcome::Rejected => "Rejected",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ReviewOutcome::Approved => "tag-approved",
            ReviewOutcome::Rejected => "tag-rejected",
        }
    }
}

/// Reviewed application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "type")]
    pub kind: ApplicantKind,
    pub user_id: String,
    pub org_name: String,
    #[serde(default)]
    pub org_type: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub documents: ApplicantDocuments,
    pub status: ReviewOutcome,
}

/// Row of one of the admin tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalRow {
    Pending(ApplicantKind, PendingApplicant),
    History(HistoryRecord),
}

impl ApprovalRow {
    pub fn user_id(&self) -> &str {
        match self {
            ApprovalRow::Pending(_, applicant) => &applicant.user_id,
            ApprovalRow::History(record) => &record.user_id,
        }
    }

    pub fn kind(&self) -> ApplicantKind {
        match self {
            ApprovalRow::Pending(kind, _) => *kind,
            ApprovalRow::History(record) => record.kind,
        }
    }

    pub fn org_name(&self) -> &str {
        match self {
            ApprovalRow::Pending(_, applicant) => &applicant.org_name,
            ApprovalRow::History(record) => &record.org_name,
        }
    }

    pub fn documents(&self) -> &ApplicantDocuments {
        match self {
            ApprovalRow::Pending(_, applicant) => &applicant.documents,
            ApprovalRow::History(record) => &record.documents,
        }
    }
}

impl ApplicantKind {
    /// Table listing pending applications of this kind.
    pub fn table(&self) -> TableId {
        match self {
            ApplicantKind::Aggregator => TableId::Aggregators,
            ApplicantKind::Buyer => TableId::Buyers,
        }
    }
}

// ============================================================================
// List / action payloads
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingAggregatorsResponse {
    pub count: usize,
    #[serde(default)]
    pub aggregators: Vec<PendingApplicant>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingBuyersResponse {
    pub count: usize,
    #[serde(default)]
    pub buyers: Vec<PendingApplicant>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationHistoryResponse {
    pub count: usize,
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
}

impl PendingAggregatorsResponse {
    pub fn into_rows(self) -> Vec<ApprovalRow> {
        self.aggregators
            .into_iter()
            .map(|a| ApprovalRow::Pending(ApplicantKind::Aggregator, a))
            .collect()
    }
}

impl PendingBuyersResponse {
    pub fn into_rows(self) -> Vec<ApprovalRow> {
        self.buyers
            .into_iter()
            .map(|b| ApprovalRow::Pending(ApplicantKind::Buyer, b))
            .collect()
    }
}

impl ApplicationHistoryResponse {
    pub fn into_rows(self) -> Vec<ApprovalRow> {
        self.history.into_iter().map(ApprovalRow::History).collect()
    }
}

/// Approve or reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn slug(&self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
        }
    }

    pub fn outcome(&self) -> ReviewOutcome {
        match self {
            ReviewAction::Approve => ReviewOutcome::Approved,
            ReviewAction::Reject => ReviewOutcome::Rejected,
        }
    }

    /// Confirmation prompt shown before the call.
    pub fn confirm_prompt(&self, kind: ApplicantKind, name: &str) -> String {
        match self {
            ReviewAction::Approve => {
                format!("Approve {} \"{}\"?", kind.slug(), name)
            }
            ReviewAction::Reject => format!(
                "Reject {} \"{}\"? This action cannot be undone.",
                kind.slug(),
                name
            ),
        }
    }

    /// `/admin/approve_aggregator/{id}` style path.
    pub fn path(&self, kind: ApplicantKind, id: &str) -> String {
        format!("/admin/{}_{}/{}", self.slug(), kind.slug(), id)
    }
}

/// Success body of approve/reject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub message: String,
}

// ============================================================================
// Document viewer
// ============================================================================

/// How the document viewer can present a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Image,
    Other,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => DocumentFormat::Pdf,
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp" => DocumentFormat::Image,
            _ => DocumentFormat::Other,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "PDF Document",
            DocumentFormat::Image => "Image File",
            DocumentFormat::Other => "Document",
        }
    }
}

/// One row of the document viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub key: &'static str,
    pub label: &'static str,
    /// Absolute URL, `None` when the document was not uploaded
    pub url: Option<String>,
    pub extension: String,
    pub format: DocumentFormat,
}

const DOCUMENT_TYPES: [(&str, &str); 3] = [
    ("registration", "Registration Certificate"),
    ("pan", "PAN Card"),
    ("aadhar", "Aadhar Card"),
];

/// Turns a stored (possibly Windows) path into a URL under `base_url`.
pub fn document_url(base_url: &str, stored_path: &str) -> String {
    let normalized = stored_path.trim().replace('\\', "/");
    let relative = normalized.trim_start_matches('/');
    format!("{}/{}", base_url.trim_end_matches('/'), relative)
}

impl ApplicantDocuments {
    fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "registration" => self.registration.as_deref(),
            "pan" => self.pan.as_deref(),
            "aadhar" => self.aadhar.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Splits documents into (uploaded, not uploaded), in fixed order.
    pub fn entries(&self, base_url: &str) -> (Vec<DocumentEntry>, Vec<DocumentEntry>) {
        let mut uploaded = Vec::new();
        let mut missing = Vec::new();
        for (key, label) in DOCUMENT_TYPES {
            match self.get(key) {
                Some(path) => {
                    let url = document_url(base_url, path);
                    let extension = url
                        .rsplit('.')
                        .next()
                        .filter(|ext| !ext.contains('/'))
                        .unwrap_or("")
                        .to_ascii_lowercase();
                    uploaded.push(DocumentEntry {
                        key,
                        label,
                        format: DocumentFormat::from_extension(&extension),
                        url: Some(url),
                        extension,
                    });
                }
                None => missing.push(DocumentEntry {
                    key,
                    label,
                    url: None,
                    extension: String::new(),
                    format: DocumentFormat::Other,
                }),
            }
        }
        (uploaded, missing)
    }
}
