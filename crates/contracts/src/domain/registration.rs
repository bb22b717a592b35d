//! Aggregator and buyer self-registration: field validation and the
//! availability check protocol.

use serde::{Deserialize, Serialize};

use super::approvals::ApplicantKind;
use crate::shared::submission::{ReceiptDefaults, SubmissionReceipt, SubmissionResponse};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 72;

/// Delay between the last keystroke and the availability lookup.
pub const AVAILABILITY_DEBOUNCE_MS: u32 = 500;

/// Seconds the post-registration view stays open.
pub const SUCCESS_VIEW_SECS: u32 = 10;

// ============================================================================
// Validation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid email address")]
    Email,
    #[error("Mobile number must be 10-15 digits")]
    Mobile,
    #[error("Phone number must be 10-15 digits")]
    Phone,
    #[error("SPOC mobile number must be 10-15 digits")]
    SpocMobile,
    #[error("Password must be 8-72 characters long")]
    Password,
    #[error("{0} is required")]
    Required(&'static str),
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    // at least one dot with something on both sides
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// 10 to 15 ASCII digits, nothing else.
pub fn is_valid_mobile(mobile: &str) -> bool {
    (10..=15).contains(&mobile.len()) && mobile.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_valid_password(password: &str) -> bool {
    (MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&password.chars().count())
}

// ============================================================================
// Forms
// ============================================================================

/// Registration form contents. Documents are attached by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub org_name: String,
    pub org_type: String,
    pub email: String,
    pub mobile: String,
    /// Buyer landline, optional
    pub phone: String,
    pub address: String,
    pub spoc_name: String,
    pub spoc_mobile: String,
    pub username: String,
    pub password: String,
}

impl RegistrationForm {
    /// First failing rule, in the order the form checks them.
    pub fn validate(&self, kind: ApplicantKind) -> Result<(), ValidationError> {
        if self.org_name.trim().is_empty() {
            return Err(ValidationError::Required("Organisation name"));
        }
        if self.username.trim().is_empty() {
            return Err(ValidationError::Required("Username"));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(ValidationError::Email);
        }
        if !is_valid_mobile(self.mobile.trim()) {
            return Err(ValidationError::Mobile);
        }
        if kind == ApplicantKind::Buyer {
            let phone = self.phone.trim();
            if !phone.is_empty() && !is_valid_mobile(phone) {
                return Err(ValidationError::Phone);
            }
        }
        if !is_valid_mobile(self.spoc_mobile.trim()) {
            return Err(ValidationError::SpocMobile);
        }
        if !is_valid_password(&self.password) {
            return Err(ValidationError::Password);
        }
        Ok(())
    }

    /// Multipart text fields, named the way each registration endpoint
    /// expects them.
    pub fn to_form_fields(&self, kind: ApplicantKind) -> Vec<(String, String)> {
        let values = [
            ("org_name", &self.org_name),
            ("org_type", &self.org_type),
            ("email", &self.email),
            ("mobile", &self.mobile),
            ("phone", &self.phone),
            ("address", &self.address),
            ("spoc_name", &self.spoc_name),
            ("spoc_mobile", &self.spoc_mobile),
            ("user_id", &self.username),
            ("password", &self.password),
        ];
        values
            .into_iter()
            .filter(|(name, value)| {
                *name != "phone" || (kind == ApplicantKind::Buyer && !value.is_empty())
            })
            .map(|(name, value)| (field_name(kind, name), value.trim().to_string()))
            .collect()
    }
}

/// Buyer fields carry a `buyer_org_` prefix and the password is keyed after
/// the user id field.
pub fn field_name(kind: ApplicantKind, name: &str) -> String {
    match (kind, name) {
        (ApplicantKind::Aggregator, _) => name.to_string(),
        (ApplicantKind::Buyer, "org_name") => "buyer_org_name".to_string(),
        (ApplicantKind::Buyer, "password") => "buyer_org_user_id_password".to_string(),
        (ApplicantKind::Buyer, other) => format!("buyer_org_{}", other.trim_start_matches("org_")),
    }
}

/// Organisation types offered per registration flow.
pub fn org_types(kind: ApplicantKind) -> &'static [&'static str] {
    match kind {
        ApplicantKind::Aggregator => &["FPO", "Cooperative", "Trader", "Other"],
        ApplicantKind::Buyer => &["Retailer", "Wholesaler", "Processor", "Exporter", "Other"],
    }
}

/// Document upload fields, (form key, label).
pub const DOCUMENT_FIELDS: [(&str, &str); 3] = [
    ("registration_doc", "Registration Certificate"),
    ("pan_doc", "PAN Card"),
    ("aadhar_doc", "Aadhar Card"),
];

pub fn register_path(kind: ApplicantKind) -> String {
    format!("/api/{}/register", kind.slug())
}

/// Receipt for a successful registration, whichever shape the backend used.
pub fn registration_receipt(
    kind: ApplicantKind,
    response: SubmissionResponse,
    submitted_username: &str,
) -> SubmissionReceipt {
    let message = match kind {
        ApplicantKind::Aggregator => {
            "Registration submitted successfully. Admin will review your application."
        }
        ApplicantKind::Buyer => {
            "Buyer registration submitted successfully. Admin will review your application."
        }
    };
    response.normalize(ReceiptDefaults {
        message,
        username: submitted_username,
    })
}

// ============================================================================
// Availability checks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityField {
    Email,
    Username,
}

impl AvailabilityField {
    pub fn path(&self, kind: ApplicantKind, value: &str) -> String {
        let segment = match self {
            AvailabilityField::Email => "check-email",
            AvailabilityField::Username => "check-username",
        };
        format!(
            "/api/{}/{}/{}",
            kind.slug(),
            segment,
            urlencoding::encode(value)
        )
    }
}

/// `{available}` body of both check endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub available: bool,
}

/// Feedback line under an availability-checked field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Idle,
    InvalidFormat,
    Checking,
    Available,
    Taken,
    CheckFailed,
}

impl Availability {
    /// Immediate state for a new input value. `Checking` means a lookup
    /// has to be scheduled.
    pub fn precheck(field: AvailabilityField, value: &str) -> Self {
        if value.is_empty() {
            Availability::Idle
        } else if field == AvailabilityField::Email && !is_valid_email(value) {
            Availability::InvalidFormat
        } else {
            Availability::Checking
        }
    }

    pub fn needs_lookup(&self) -> bool {
        matches!(self, Availability::Checking)
    }

    pub fn from_response(result: Result<AvailabilityResponse, ()>) -> Self {
        match result {
            Ok(r) if r.available => Availability::Available,
            Ok(_) => Availability::Taken,
            Err(()) => Availability::CheckFailed,
        }
    }

    pub fn message(&self, field: AvailabilityField) -> &'static str {
        match (self, field) {
            (Availability::Idle, _) => "",
            (Availability::InvalidFormat, _) => "Invalid email format",
            (Availability::Checking, _) => "Checking...",
            (Availability::Available, _) => "Available",
            (Availability::Taken, AvailabilityField::Email) => "Email already registered",
            (Availability::Taken, AvailabilityField::Username) => "Username already taken",
            (Availability::CheckFailed, _) => "Check failed",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Availability::Idle => "field-feedback",
            Availability::InvalidFormat | Availability::CheckFailed => "field-feedback error",
            Availability::Checking => "field-feedback checking",
            Availability::Available => "field-feedback available",
            Availability::Taken => "field-feedback unavailable",
        }
    }
}

/// Latest-wins bookkeeping for one field. Every scheduled lookup takes a
/// number; only the newest number may publish its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.latest
    }

    /// Supersedes everything issued so far (input cleared, form reset).
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RegistrationForm {
        RegistrationForm {
            org_name: "Green Earth FPO".into(),
            org_type: "FPO".into(),
            email: "contact@greenearth.org".into(),
            mobile: "9876543210".into(),
            phone: String::new(),
            address: "Anantapur".into(),
            spoc_name: "Ravi".into(),
            spoc_mobile: "9123456780".into(),
            username: "greenearth".into(),
            password: "s3cretpass".into(),
        }
    }

    #[test]
    fn test_email_rule() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.in"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
    }

    #[test]
    fn test_mobile_and_password_rules() {
        assert!(is_valid_mobile("9876543210"));
        assert!(is_valid_mobile("919876543210123"));
        assert!(!is_valid_mobile("987654321"));
        assert!(!is_valid_mobile("9876543210123456"));
        assert!(!is_valid_mobile("98765-43210"));
        assert!(is_valid_password("12345678"));
        assert!(!is_valid_password("1234567"));
        assert!(!is_valid_password(&"x".repeat(73)));
    }

    #[test]
    fn test_form_validation_order() {
        assert_eq!(valid_form().validate(ApplicantKind::Aggregator), Ok(()));

        let mut form = valid_form();
        form.email = "broken".into();
        form.mobile = "1".into();
        assert_eq!(form.validate(ApplicantKind::Aggregator), Err(ValidationError::Email));

        let mut form = valid_form();
        form.phone = "123".into();
        assert_eq!(form.validate(ApplicantKind::Aggregator), Ok(()));
        assert_eq!(form.validate(ApplicantKind::Buyer), Err(ValidationError::Phone));

        let mut form = valid_form();
        form.password = "short".into();
        assert_eq!(
            form.validate(ApplicantKind::Buyer).unwrap_err().to_string(),
            "Password must be 8-72 characters long"
        );
    }

    #[test]
    fn test_buyer_field_names() {
        let fields = valid_form().to_form_fields(ApplicantKind::Buyer);
        let names: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert!(names.contains(&"buyer_org_name"));
        assert!(names.contains(&"buyer_org_email"));
        assert!(names.contains(&"buyer_org_spoc_mobile"));
        assert!(names.contains(&"buyer_org_user_id"));
        assert!(names.contains(&"buyer_org_user_id_password"));
        assert!(!names.contains(&"buyer_org_phone"));

        let agg = valid_form().to_form_fields(ApplicantKind::Aggregator);
        assert!(agg.iter().any(|(k, v)| k == "user_id" && v == "greenearth"));
        assert!(!agg.iter().any(|(k, _)| k == "phone"));
    }

    #[test]
    fn test_availability_flow() {
        assert_eq!(Availability::precheck(AvailabilityField::Email, ""), Availability::Idle);
        assert_eq!(
            Availability::precheck(AvailabilityField::Email, "nope"),
            Availability::InvalidFormat
        );
        assert!(Availability::precheck(AvailabilityField::Username, "nope").needs_lookup());
        let taken = Availability::from_response(Ok(AvailabilityResponse { available: false }));
        assert_eq!(taken.message(AvailabilityField::Username), "Username already taken");
        assert_eq!(Availability::from_response(Err(())), Availability::CheckFailed);
    }

    #[test]
    fn test_availability_path_encodes_value() {
        assert_eq!(
            AvailabilityField::Email.path(ApplicantKind::Buyer, "a+b@c.in"),
            "/api/buyer/check-email/a%2Bb%40c.in"
        );
    }

    #[test]
    fn test_only_latest_sequence_publishes() {
        let mut seq = RequestSequence::default();
        let first = seq.next();
        let second = seq.next();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
        seq.invalidate();
        assert!(!seq.is_latest(second));
    }

    #[test]
    fn test_registration_receipt_defaults() {
        let response: SubmissionResponse =
            serde_json::from_str(r#"{"message":"","aggregator_id":"AGG-3"}"#).unwrap();
        let receipt = registration_receipt(ApplicantKind::Aggregator, response, "greenearth");
        assert_eq!(receipt.id, "AGG-3");
        assert_eq!(receipt.username, "greenearth");
        assert_eq!(receipt.status, "Pending Approval");
        assert!(receipt.message.starts_with("Registration submitted"));
    }
}
