use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Review state of an application or catchment request.
///
/// Stored numerically by the backend: 0 = Pending, 1 = Approved, 2 = Rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "u8")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn code(&self) -> u8 {
        match self {
            ApplicationStatus::Pending => 0,
            ApplicationStatus::Approved => 1,
            ApplicationStatus::Rejected => 2,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Status as rows carry it: a number, a numeric string or null.
    /// `None` for null; any other unrecognised value is pending.
    pub fn from_json(value: &Value) -> Option<Self> {
        let code = match value {
            Value::Null => return None,
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        Some(
            code.and_then(|c| u8::try_from(c).ok())
                .map(Self::from)
                .unwrap_or_default(),
        )
    }

    /// First status that is set, in order of preference.
    pub fn first_set(values: &[Option<Value>]) -> Option<Self> {
        values.iter().flatten().find_map(Self::from_json)
    }

    /// CSS class of the status tag
    pub fn css_class(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "status-pending",
            ApplicationStatus::Approved => "status-approved",
            ApplicationStatus::Rejected => "status-rejected",
        }
    }
}

/// Unknown codes display as pending.
impl From<u8> for ApplicationStatus {
    fn from(code: u8) -> Self {
        match code {
            1 => ApplicationStatus::Approved,
            2 => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Pending,
        }
    }
}

impl<'de> Deserialize<'de> for ApplicationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value).unwrap_or_default())
    }
}

impl From<ApplicationStatus> for u8 {
    fn from(status: ApplicationStatus) -> Self {
        status.code()
    }
}
