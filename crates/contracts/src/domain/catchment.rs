//! Catchment area requests: the dependent form fields, their wire format and
//! the records shown back on the dashboard.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::demographics::LocationLevel;
use crate::enums::ApplicationStatus;
use crate::shared::selector::{NodeSpec, SelectorChain};
use crate::shared::sentinel::{first_filled, NA};

// ============================================================================
// Form fields
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatchmentField {
    District,
    Mandal,
    Panchayat,
    Village,
    Vo,
    Shg,
    Crop,
    Variety,
    Season,
    Period,
}

impl CatchmentField {
    /// DOM id / form key prefix
    pub fn id(&self) -> &'static str {
        match self {
            CatchmentField::District => "district",
            CatchmentField::Mandal => "mandal",
            CatchmentField::Panchayat => "panchayat",
            CatchmentField::Village => "village",
            CatchmentField::Vo => "vo",
            CatchmentField::Shg => "shg",
            CatchmentField::Crop => "crop",
            CatchmentField::Variety => "crop_variety",
            CatchmentField::Season => "season",
            CatchmentField::Period => "period",
        }
    }

    /// Location level looked up for this field, if it is part of the
    /// location cascade.
    pub fn location_level(&self) -> Option<LocationLevel> {
        match self {
            CatchmentField::District => Some(LocationLevel::District),
            CatchmentField::Mandal => Some(LocationLevel::Mandal),
            CatchmentField::Panchayat => Some(LocationLevel::Panchayat),
            CatchmentField::Village => Some(LocationLevel::Village),
            CatchmentField::Vo => Some(LocationLevel::Vo),
            CatchmentField::Shg => Some(LocationLevel::Shg),
            _ => None,
        }
    }
}

/// Field layout of the catchment request form. VO, SHG and variety are
/// optional; everything else is required.
pub fn catchment_specs() -> Vec<NodeSpec<CatchmentField>> {
    use CatchmentField::*;
    vec![
        NodeSpec::required(District, "District", "districts"),
        NodeSpec::required(Mandal, "Mandal", "mandals").child_of(District),
        NodeSpec::required(Panchayat, "Panchayat", "panchayats").child_of(Mandal),
        NodeSpec::required(Village, "Village", "villages").child_of(Panchayat),
        NodeSpec::optional(Vo, "VO", "VOs").child_of(Village),
        NodeSpec::optional(Shg, "SHG", "SHGs")
            .child_of(Vo)
            .fetch_on_empty_parent(),
        NodeSpec::required(Crop, "Crop", "crops"),
        NodeSpec::optional(Variety, "Variety", "varieties")
            .child_of(Crop)
            .derived(),
        NodeSpec::required(Season, "Season", "seasons"),
        NodeSpec::required(Period, "Period", "periods"),
    ]
}

/// Selector chain plus the request serialization.
#[derive(Debug, Clone)]
pub struct CatchmentForm {
    pub chain: SelectorChain<CatchmentField>,
}

impl Default for CatchmentForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CatchmentForm {
    pub fn new() -> Self {
        Self {
            chain: SelectorChain::new(catchment_specs()),
        }
    }

    /// Multipart fields of `POST /api/catchment/request`.
    ///
    /// Optional fields always carry a printable value: `NA` when unset.
    pub fn to_form_fields(&self) -> Vec<(String, String)> {
        use CatchmentField::*;
        let c = &self.chain;
        let mut fields = Vec::new();
        for field in [District, Mandal, Panchayat, Village, Vo, Shg, Crop, Variety] {
            fields.push((format!("{}_id", field.id()), c.submission_value(field)));
            fields.push((format!("{}_name", field.id()), c.submission_label(field)));
        }
        fields.push(("season".to_string(), c.submission_value(Season)));
        fields.push(("period".to_string(), c.submission_value(Period)));
        fields
    }

    /// "Village, Panchayat, Mandal, District" line of the success summary.
    pub fn location_summary(&self) -> String {
        use CatchmentField::*;
        [Village, Panchayat, Mandal, District]
            .iter()
            .map(|f| self.chain.submission_label(*f))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Summary kept after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchmentReceipt {
    pub request_id: String,
    pub location: String,
    pub crop: String,
    pub season: String,
}

impl CatchmentReceipt {
    pub fn from_form(request_id: String, form: &CatchmentForm) -> Self {
        let c = &form.chain;
        Self {
            request_id,
            location: form.location_summary(),
            crop: c.submission_label(CatchmentField::Crop),
            season: format!(
                "{} {}",
                c.value(CatchmentField::Season),
                c.value(CatchmentField::Period)
            ),
        }
    }
}

/// Message for a rejected catchment submission, by HTTP status.
pub fn submission_failure_message(status: u16, error: Option<&str>, message: Option<&str>) -> String {
    match (status, error) {
        (401, _) => "Session expired. Please login again.".to_string(),
        (403, _) => "Unauthorized. Only aggregators can submit catchment requests.".to_string(),
        (409, _) | (_, Some("duplicate")) => message
            .unwrap_or("Catchment request already exists for this Village + Crop + Season + Period.")
            .to_string(),
        (422, _) => "Validation error. Please check all required fields.".to_string(),
        _ => format!(
            "Error: {}",
            message.or(error).unwrap_or("Failed to submit request")
        ),
    }
}

// ============================================================================
// Records
// ============================================================================

/// Catchment row. The backend has shipped several spellings of the same
/// columns; rows are read through [`CatchmentRow`] and the first filled
/// spelling wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CatchmentRow")]
pub struct CatchmentRecord {
    pub id: Option<String>,
    pub aggregator_id: Option<String>,
    pub district_name: Option<String>,
    pub mandal_name: Option<String>,
    pub panchayat_name: Option<String>,
    pub village_name: Option<String>,
    pub crop_name: Option<String>,
    pub season: Option<String>,
    pub period: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatchmentRow {
    id: Option<String>,
    catchment_id: Option<String>,
    acm_id: Option<String>,
    aggregator_id: Option<String>,
    district_name: Option<String>,
    district: Option<String>,
    mandal_name: Option<String>,
    mandal: Option<String>,
    panchayat_name: Option<String>,
    panchayat: Option<String>,
    village_name: Option<String>,
    village: Option<String>,
    crop_name: Option<String>,
    crop: Option<String>,
    season: Option<String>,
    period: Option<String>,
    status: ApplicationStatus,
    created_at: Option<String>,
}

impl From<CatchmentRow> for CatchmentRecord {
    fn from(row: CatchmentRow) -> Self {
        Self {
            id: first_filled([row.id, row.catchment_id, row.acm_id]),
            aggregator_id: row.aggregator_id,
            district_name: first_filled([row.district_name, row.district]),
            mandal_name: first_filled([row.mandal_name, row.mandal]),
            panchayat_name: first_filled([row.panchayat_name, row.panchayat]),
            village_name: first_filled([row.village_name, row.village]),
            crop_name: first_filled([row.crop_name, row.crop]),
            season: row.season,
            period: row.period,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Farmer row. Accepts the `aggregator_`-prefixed columns of the mapping
/// table and the `dm_` location columns of the demographics join.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FarmerRow")]
pub struct FarmerRecord {
    pub farmer_id: Option<String>,
    pub farmer_name: Option<String>,
    pub farmer_category: Option<String>,
    pub district_name: Option<String>,
    pub mandal_name: Option<String>,
    pub panchayat_name: Option<String>,
    pub village_name: Option<String>,
    pub crop_name: Option<String>,
    pub acreage: Option<f64>,
    pub status: ApplicationStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FarmerRow {
    farmer_id: Option<String>,
    aggregator_farmer_id: Option<String>,
    farmer_name: Option<String>,
    aggregator_farmer_name: Option<String>,
    farmer_category: Option<String>,
    aggregator_farmer_category: Option<String>,
    district_name: Option<String>,
    dm_district_name: Option<String>,
    mandal_name: Option<String>,
    dm_mandal_name: Option<String>,
    panchayat_name: Option<String>,
    dm_panchayat_name: Option<String>,
    village_name: Option<String>,
    dm_village_name: Option<String>,
    crop_name: Option<String>,
    acreage: Option<f64>,
    mapping_status: Option<Value>,
    status: Option<Value>,
}

impl From<FarmerRow> for FarmerRecord {
    fn from(row: FarmerRow) -> Self {
        Self {
            farmer_id: first_filled([row.farmer_id, row.aggregator_farmer_id]),
            farmer_name: first_filled([row.farmer_name, row.aggregator_farmer_name]),
            farmer_category: first_filled([row.farmer_category, row.aggregator_farmer_category]),
            district_name: first_filled([row.district_name, row.dm_district_name]),
            mandal_name: first_filled([row.mandal_name, row.dm_mandal_name]),
            panchayat_name: first_filled([row.panchayat_name, row.dm_panchayat_name]),
            village_name: first_filled([row.village_name, row.dm_village_name]),
            crop_name: row.crop_name,
            acreage: row.acreage,
            // listed farmers are mapped unless a row says otherwise
            status: ApplicationStatus::first_set(&[row.mapping_status, row.status])
                .unwrap_or(ApplicationStatus::Approved),
        }
    }
}

/// `None`/empty cells render as `-`.
pub fn cell(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MyRequestsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub requests: Vec<CatchmentRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmersResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub farmers: Vec<FarmerRecord>,
}

/// Counters of the aggregator dashboard. Missing values count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub approved_catchments: u32,
    #[serde(default)]
    pub approved_farmers: u32,
    #[serde(default)]
    pub total_batches: u32,
}

/// Success body of a catchment submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatchmentSubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, alias = "acm_id")]
    pub catchment_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CatchmentSubmitResponse {
    pub fn request_id(&self) -> String {
        self.catchment_id.clone().unwrap_or_else(|| NA.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::selector::SelectOption;
    use CatchmentField::*;

    fn field<'a>(fields: &'a [(String, String)], key: &str) -> &'a str {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("missing field {}", key))
    }

    fn filled_form() -> CatchmentForm {
        let mut form = CatchmentForm::new();
        let c = &mut form.chain;
        let t = c.begin_load(District).unwrap();
        c.resolve(&t, Ok(vec![SelectOption::new("D1", "Anantapur")]));
        let t = c.select(District, "D1").remove(0);
        c.resolve(&t, Ok(vec![SelectOption::new("M1", "Hindupur")]));
        let t = c.select(Mandal, "M1").remove(0);
        c.resolve(&t, Ok(vec![SelectOption::new("P1", "Lepakshi")]));
        let t = c.select(Panchayat, "P1").remove(0);
        c.resolve(&t, Ok(vec![SelectOption::new("V1", "Lepakshi Village")]));
        let t = c.select(Village, "V1").remove(0);
        c.resolve(&t, Err("404".into()));
        let t = c.begin_load(Crop).unwrap();
        c.resolve(
            &t,
            Ok(vec![SelectOption::new("C1", "Groundnut").with_linked("CV1", "TMV-2")]),
        );
        c.select(Crop, "C1");
        let t = c.begin_load(Season).unwrap();
        c.resolve(&t, Ok(vec![SelectOption::new("Kharif", "Kharif")]));
        c.select(Season, "Kharif");
        let t = c.begin_load(Period).unwrap();
        c.resolve(&t, Ok(vec![SelectOption::new("2025-26", "2025-26")]));
        c.select(Period, "2025-26");
        form
    }

    #[test]
    fn test_required_fields_block_submission() {
        let form = CatchmentForm::new();
        let err = form.chain.validate().unwrap_err();
        assert_eq!(
            err.0,
            vec!["District", "Mandal", "Panchayat", "Village", "Crop", "Season", "Period"]
        );
    }

    #[test]
    fn test_filled_form_passes_with_optional_sentinels() {
        let form = filled_form();
        assert!(form.chain.validate().is_ok());

        let fields = form.to_form_fields();
        assert_eq!(field(&fields, "district_name"), "Anantapur");
        assert_eq!(field(&fields, "village_id"), "V1");
        assert_eq!(field(&fields, "vo_id"), "NA");
        assert_eq!(field(&fields, "vo_name"), "NA");
        assert_eq!(field(&fields, "shg_id"), "NA");
        assert_eq!(field(&fields, "shg_name"), "NA");
        assert_eq!(field(&fields, "crop_variety_id"), "NA");
        assert_eq!(field(&fields, "crop_variety_name"), "NA");
        assert_eq!(field(&fields, "season"), "Kharif");
        assert_eq!(field(&fields, "period"), "2025-26");
        assert!(fields.iter().all(|(_, v)| !v.is_empty()));
    }

    #[test]
    fn test_concrete_variety_is_sent() {
        let mut form = filled_form();
        form.chain.select(Variety, "CV1");
        let fields = form.to_form_fields();
        assert_eq!(field(&fields, "crop_variety_id"), "CV1");
        assert_eq!(field(&fields, "crop_variety_name"), "TMV-2");
    }

    #[test]
    fn test_receipt_summary() {
        let form = filled_form();
        let receipt = CatchmentReceipt::from_form("ACM-1".into(), &form);
        assert_eq!(receipt.location, "Lepakshi Village, Lepakshi, Hindupur, Anantapur");
        assert_eq!(receipt.crop, "Groundnut");
        assert_eq!(receipt.season, "Kharif 2025-26");
    }

    #[test]
    fn test_failure_messages() {
        assert!(submission_failure_message(401, None, None).contains("Session expired"));
        assert_eq!(submission_failure_message(409, None, Some("dup")), "dup");
        assert_eq!(
            submission_failure_message(400, Some("duplicate"), None),
            "Catchment request already exists for this Village + Crop + Season + Period."
        );
        assert_eq!(submission_failure_message(500, None, None), "Error: Failed to submit request");
    }

    #[test]
    fn test_farmer_aliases() {
        let a: FarmerRecord = serde_json::from_str(r#"{"farmer_id":"F1","status":1}"#).unwrap();
        let b: FarmerRecord =
            serde_json::from_str(r#"{"aggregator_farmer_id":"F1","status":1}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.status, ApplicationStatus::Approved);
    }

    #[test]
    fn test_farmer_with_both_spellings() {
        let r: FarmerRecord = serde_json::from_str(
            r#"{"farmer_id":"","aggregator_farmer_id":"F1","farmer_name":"Ramu","aggregator_farmer_name":"R"}"#,
        )
        .unwrap();
        assert_eq!(r.farmer_id.as_deref(), Some("F1"));
        assert_eq!(r.farmer_name.as_deref(), Some("Ramu"));
    }

    #[test]
    fn test_farmer_demographic_columns() {
        let r: FarmerRecord = serde_json::from_str(
            r#"{"dm_district_name":"Anantapur","dm_village_name":"Moda","aggregator_farmer_category":"Small","mapping_status":2,"status":1}"#,
        )
        .unwrap();
        assert_eq!(r.district_name.as_deref(), Some("Anantapur"));
        assert_eq!(cell(&r.village_name), "Moda");
        assert_eq!(r.farmer_category.as_deref(), Some("Small"));
        assert_eq!(r.status, ApplicationStatus::Rejected);
    }

    #[test]
    fn test_farmer_status_fallbacks() {
        let r: FarmerRecord = serde_json::from_str(r#"{"farmer_id":"F1"}"#).unwrap();
        assert_eq!(r.status, ApplicationStatus::Approved);
        let r: FarmerRecord =
            serde_json::from_str(r#"{"farmer_id":"F1","mapping_status":null,"status":0}"#).unwrap();
        assert_eq!(r.status, ApplicationStatus::Pending);

        let list: FarmersResponse =
            serde_json::from_str(r#"{"farmers":[{"farmer_id":"F1","status":null}]}"#).unwrap();
        assert_eq!(list.farmers[0].status, ApplicationStatus::Approved);
    }

    #[test]
    fn test_catchment_record_spellings() {
        let r: CatchmentRecord = serde_json::from_str(
            r#"{"id":"ACM-1","acm_id":"ACM-1","district_name":"Anantapur","district":"ATP","status":null}"#,
        )
        .unwrap();
        assert_eq!(r.id.as_deref(), Some("ACM-1"));
        assert_eq!(r.district_name.as_deref(), Some("Anantapur"));
        assert_eq!(r.status, ApplicationStatus::Pending);

        let r: CatchmentRecord = serde_json::from_str(r#"{"status":9}"#).unwrap();
        assert_eq!(r.status.display_name(), "Pending");
    }

    #[test]
    fn test_catchment_record_defaults() {
        let r: CatchmentRecord = serde_json::from_str(r#"{"village":"Moda"}"#).unwrap();
        assert_eq!(cell(&r.village_name), "Moda");
        assert_eq!(cell(&r.crop_name), "-");
        assert_eq!(r.status, ApplicationStatus::Pending);
    }
}
