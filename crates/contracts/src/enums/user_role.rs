use serde::{Deserialize, Serialize};

/// Portal roles as numbered by the backend (`user_role`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UserRole {
    Admin,
    Aggregator,
    Buyer,
}

impl UserRole {
    pub fn code(&self) -> u8 {
        match self {
            UserRole::Admin => 1,
            UserRole::Aggregator => 2,
            UserRole::Buyer => 3,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Aggregator => "Aggregator",
            UserRole::Buyer => "Buyer",
        }
    }

    /// Lowercase name used in the `role` field and in URL segments.
    pub fn slug(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Aggregator => "aggregator",
            UserRole::Buyer => "buyer",
        }
    }
}

impl TryFrom<u8> for UserRole {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(UserRole::Admin),
            2 => Ok(UserRole::Aggregator),
            3 => Ok(UserRole::Buyer),
            other => Err(format!("Unknown user role: {}", other)),
        }
    }
}

impl From<UserRole> for u8 {
    fn from(role: UserRole) -> Self {
        role.code()
    }
}
