use serde::{Deserialize, Serialize};

use crate::shared::selector::SelectOption;
use crate::shared::sentinel::{or_na, NA};

// ============================================================================
// Location hierarchy
// ============================================================================

/// Levels of the location cascade, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationLevel {
    District,
    Mandal,
    Panchayat,
    Village,
    Vo,
    Shg,
}

impl LocationLevel {
    pub fn all() -> [LocationLevel; 6] {
        [
            LocationLevel::District,
            LocationLevel::Mandal,
            LocationLevel::Panchayat,
            LocationLevel::Village,
            LocationLevel::Vo,
            LocationLevel::Shg,
        ]
    }

    /// Collection key in lookup responses and path segment of the endpoint.
    pub fn collection(&self) -> &'static str {
        match self {
            LocationLevel::District => "districts",
            LocationLevel::Mandal => "mandals",
            LocationLevel::Panchayat => "panchayats",
            LocationLevel::Village => "villages",
            LocationLevel::Vo => "vos",
            LocationLevel::Shg => "shgs",
        }
    }

    fn path_segment(&self) -> &'static str {
        match self {
            LocationLevel::Vo => "vo",
            LocationLevel::Shg => "shg",
            other => other.collection(),
        }
    }

    /// Lookup path for this level given its parent id. SHGs are keyed by
    /// village with the VO as optional filter.
    pub fn lookup_path(&self, parent_id: Option<&str>, vo_id: Option<&str>) -> String {
        let mut path = format!("/api/demographics/{}", self.path_segment());
        if let Some(parent) = parent_id {
            path.push('/');
            path.push_str(&encode_segment(parent));
        }
        if let (LocationLevel::Shg, Some(vo)) = (self, vo_id.filter(|v| !v.is_empty())) {
            path.push_str("?vo_id=");
            path.push_str(&encode_segment(vo));
        }
        path
    }
}

/// Percent-encodes a path segment.
pub fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// `{id, name}` entry of a location lookup. VO and SHG rows may use
/// prefixed field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupItem {
    #[serde(default, alias = "vo_id", alias = "shg_id")]
    pub id: String,
    #[serde(default, alias = "vo_name", alias = "shg_name")]
    pub name: Option<String>,
}

impl LookupItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    pub fn to_option(&self) -> SelectOption {
        SelectOption::new(self.id.clone(), or_na(self.name.as_deref().unwrap_or("")))
    }
}

/// `{success, <collection>: [...]}` body of every location lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(
        default,
        alias = "districts",
        alias = "mandals",
        alias = "panchayats",
        alias = "villages",
        alias = "vos",
        alias = "shgs"
    )]
    pub items: Vec<LookupItem>,
}

impl LookupResponse {
    /// Options for the selector; `success:false` counts as a failed lookup.
    pub fn into_options(self) -> Result<Vec<SelectOption>, String> {
        if !self.success {
            return Err("lookup reported success: false".to_string());
        }
        Ok(self.items.iter().map(LookupItem::to_option).collect())
    }

    /// Body as the backend sends it, keyed by the level's collection name.
    pub fn to_json(level: LocationLevel, items: &[LookupItem]) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert("success".into(), serde_json::Value::Bool(true));
        body.insert(
            level.collection().into(),
            serde_json::to_value(items).unwrap_or_default(),
        );
        body.insert("count".into(), serde_json::Value::from(items.len()));
        serde_json::Value::Object(body)
    }
}

// ============================================================================
// Crops
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crop {
    pub crop_id: String,
    #[serde(default)]
    pub crop_name: Option<String>,
    #[serde(default)]
    pub crop_variety_id: Option<String>,
    #[serde(default)]
    pub crop_variety_name: Option<String>,
}

impl Crop {
    /// Crop option carrying its variety for the derived variety field.
    pub fn to_option(&self) -> SelectOption {
        SelectOption::new(
            self.crop_id.clone(),
            or_na(self.crop_name.as_deref().unwrap_or("")),
        )
        .with_linked(
            or_na(self.crop_variety_id.as_deref().unwrap_or("")),
            or_na(self.crop_variety_name.as_deref().unwrap_or("")),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub crops: Vec<Crop>,
}

impl CropsResponse {
    pub fn into_options(self) -> Result<Vec<SelectOption>, String> {
        if !self.success {
            return Err("crop lookup reported success: false".to_string());
        }
        Ok(self.crops.iter().map(Crop::to_option).collect())
    }
}

// ============================================================================
// Seasons
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonPeriod {
    pub season: String,
    pub period: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub seasons: Vec<SeasonPeriod>,
}

impl SeasonsResponse {
    /// Distinct seasons in first-seen order.
    pub fn season_options(&self) -> Result<Vec<SelectOption>, String> {
        self.ensure_success()?;
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.seasons {
            if !seen.contains(&entry.season.as_str()) {
                seen.push(&entry.season);
            }
        }
        Ok(seen.into_iter().map(|s| SelectOption::new(s, or_na(s))).collect())
    }

    /// Distinct periods, latest first.
    pub fn period_options(&self) -> Result<Vec<SelectOption>, String> {
        self.ensure_success()?;
        let mut periods: Vec<&str> = self.seasons.iter().map(|s| s.period.as_str()).collect();
        periods.sort_unstable();
        periods.dedup();
        periods.reverse();
        Ok(periods.into_iter().map(|p| SelectOption::new(p, or_na(p))).collect())
    }

    fn ensure_success(&self) -> Result<(), String> {
        if self.success {
            Ok(())
        } else {
            Err("season lookup reported success: false".to_string())
        }
    }
}

/// Label used when a lookup returned no name.
pub fn display_name(name: Option<&str>) -> String {
    name.filter(|n| !n.trim().is_empty())
        .unwrap_or(NA)
        .to_string()
}
