use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::shared::sentinel::first_filled;

/// One farmer's contribution to a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerSource {
    pub farmer_id: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub consent: bool,
}

/// Procurement batch. Read through [`BatchRow`], which accepts the camelCase
/// and snake_case spelling of every column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "BatchRow")]
pub struct Batch {
    pub batch_id: String,
    pub batch_name: Option<String>,
    pub crop_name: String,
    pub crop_variety: Option<String>,
    pub procurement_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub aggregator_name: Option<String>,
    pub farmer_sources: Vec<FarmerSource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BatchRow {
    batch_id: Option<String>,
    #[serde(rename = "batch_id")]
    batch_id_snake: Option<String>,
    batch_name: Option<String>,
    #[serde(rename = "batch_name")]
    batch_name_snake: Option<String>,
    crop_name: Option<String>,
    #[serde(rename = "crop_name")]
    crop_name_snake: Option<String>,
    crop_variety: Option<String>,
    #[serde(rename = "crop_variety")]
    crop_variety_snake: Option<String>,
    procurement_date: Option<NaiveDate>,
    #[serde(rename = "procurement_date")]
    procurement_date_snake: Option<NaiveDate>,
    expiry_date: Option<NaiveDate>,
    #[serde(rename = "expiry_date")]
    expiry_date_snake: Option<NaiveDate>,
    aggregator_name: Option<String>,
    #[serde(rename = "aggregator_name")]
    aggregator_name_snake: Option<String>,
    farmer_sources: Option<Vec<FarmerSource>>,
    #[serde(rename = "farmer_sources")]
    farmer_sources_snake: Option<Vec<FarmerSource>>,
}

impl TryFrom<BatchRow> for Batch {
    type Error = String;

    fn try_from(row: BatchRow) -> Result<Self, Self::Error> {
        let batch_id = first_filled([row.batch_id, row.batch_id_snake])
            .ok_or_else(|| "batch without batchId".to_string())?;
        let crop_name = first_filled([row.crop_name, row.crop_name_snake])
            .ok_or_else(|| format!("batch {} without cropName", batch_id))?;
        let procurement_date = row
            .procurement_date
            .or(row.procurement_date_snake)
            .ok_or_else(|| format!("batch {} without procurementDate", batch_id))?;
        Ok(Self {
            batch_id,
            batch_name: first_filled([row.batch_name, row.batch_name_snake]),
            crop_name,
            crop_variety: first_filled([row.crop_variety, row.crop_variety_snake]),
            procurement_date,
            expiry_date: row.expiry_date.or(row.expiry_date_snake),
            aggregator_name: first_filled([row.aggregator_name, row.aggregator_name_snake]),
            farmer_sources: row
                .farmer_sources
                .or(row.farmer_sources_snake)
                .unwrap_or_default(),
        })
    }
}

impl Batch {
    pub fn total_quantity(&self) -> f64 {
        self.farmer_sources.iter().map(|s| s.quantity).sum()
    }

    /// `B...` followed by the last six characters of the id.
    pub fn short_id(&self) -> String {
        let chars: Vec<char> = self.batch_id.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(6)..].iter().collect();
        format!("B...{}", tail)
    }

    pub fn title(&self) -> String {
        format!(
            "{} - {}",
            self.crop_name,
            self.batch_name.as_deref().unwrap_or("Batch")
        )
    }

    pub fn cancel_prompt(&self) -> String {
        format!(
            "Are you sure you want to cancel batch {}? This action cannot be undone.",
            self.short_id()
        )
    }

    pub fn cancelled_message(&self) -> String {
        format!("Batch {} has been cancelled.", self.short_id())
    }
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

pub fn format_quantity(kgs: f64) -> String {
    format!("{:.2} kgs", kgs)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub batches: Vec<Batch>,
}

/// Answer to `DELETE /api/batches/{batch_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelBatchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// Traceability
// ============================================================================

/// Supply-chain step shown on the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub stage: String,
    #[serde(default)]
    pub location: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Farmer row of the traceability page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFarmer {
    pub farmer_id: String,
    pub name: String,
    #[serde(default)]
    pub mandal: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub acreage: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceabilityResponse {
    #[serde(default)]
    pub success: bool,
    pub batch: Batch,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub farmers: Vec<TraceFarmer>,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

impl TraceabilityResponse {
    /// Events in chronological order.
    pub fn timeline(&self) -> Vec<&TraceEvent> {
        let mut events: Vec<&TraceEvent> = self.events.iter().collect();
        events.sort_by_key(|e| e.timestamp);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_json() -> &'static str {
        r#"{
            "batchId": "BATCH-2619283-001",
            "batchName": "Groundnut Batch 1",
            "cropName": "Groundnut",
            "cropVariety": "TMV-2",
            "procurementDate": "2026-01-05",
            "aggregatorName": "Green Earth Aggregators",
            "farmerSources": [
                {"farmerId": "FRM-100201", "quantity": 150.5, "consent": true},
                {"farmerId": "FRM-100202", "quantity": 85.0, "consent": true}
            ]
        }"#
    }

    #[test]
    fn test_batch_parses_and_derives() {
        let batch: Batch = serde_json::from_str(batch_json()).unwrap();
        assert_eq!(batch.short_id(), "B...83-001");
        assert_eq!(format_quantity(batch.total_quantity()), "235.50 kgs");
        assert_eq!(batch.title(), "Groundnut - Groundnut Batch 1");
        assert_eq!(format_date(&batch.procurement_date), "05 Jan 2026");
        assert_eq!(batch.expiry_date, None);
    }

    #[test]
    fn test_snake_case_aliases() {
        let batch: Batch = serde_json::from_str(
            r#"{"batch_id":"B1","crop_name":"Maize","procurement_date":"2025-12-01"}"#,
        )
        .unwrap();
        assert_eq!(batch.short_id(), "B...B1");
        assert!(batch.farmer_sources.is_empty());
    }

    #[test]
    fn test_both_spellings_in_one_row() {
        let batch: Batch = serde_json::from_str(
            r#"{"batchId":"BATCH-7","batch_id":"BATCH-7","cropName":"","crop_name":"Maize","procurement_date":"2025-12-01"}"#,
        )
        .unwrap();
        assert_eq!(batch.crop_name, "Maize");
        let missing = serde_json::from_str::<Batch>(r#"{"cropName":"Maize"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn test_cancel_texts() {
        let batch: Batch = serde_json::from_str(batch_json()).unwrap();
        assert_eq!(
            batch.cancel_prompt(),
            "Are you sure you want to cancel batch B...83-001? This action cannot be undone."
        );
        assert_eq!(batch.cancelled_message(), "Batch B...83-001 has been cancelled.");
    }

    #[test]
    fn test_serializes_camel_case() {
        let batch: Batch = serde_json::from_str(batch_json()).unwrap();
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(value["batchId"], "BATCH-2619283-001");
        let again: Batch = serde_json::from_value(value).unwrap();
        assert_eq!(again, batch);
    }

    #[test]
    fn test_timeline_is_chronological() {
        let body = format!(
            r#"{{"success":true,"batch":{},"events":[
                {{"stage":"Dispatched","timestamp":"2026-01-07T10:00:00Z"}},
                {{"stage":"Procured","timestamp":"2026-01-05T08:00:00Z"}}
            ]}}"#,
            batch_json()
        );
        let trace: TraceabilityResponse = serde_json::from_str(&body).unwrap();
        let stages: Vec<&str> = trace.timeline().iter().map(|e| e.stage.as_str()).collect();
        assert_eq!(stages, vec!["Procured", "Dispatched"]);
    }
}
