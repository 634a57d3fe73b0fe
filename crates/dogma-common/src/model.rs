//! Shared model types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DogmaError;

/// Outcome of an IP access-control rule when it matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IpAccessAction {
    #[default]
    Allow,
    Deny,
}

impl IpAccessAction {
    pub fn as_str(self) -> &'static str {
        match self {
            IpAccessAction::Allow => "ALLOW",
            IpAccessAction::Deny => "DENY",
        }
    }

    pub fn is_allow(self) -> bool {
        self == IpAccessAction::Allow
    }
}

impl std::fmt::Display for IpAccessAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IpAccessAction {
    type Err = DogmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALLOW" => Ok(IpAccessAction::Allow),
            "DENY" => Ok(IpAccessAction::Deny),
            _ => Err(DogmaError::InvalidAction(s.to_string())),
        }
    }
}

/// Who did something, and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAndTimestamp {
    pub user: String,
    pub timestamp: DateTime<Utc>,
}

impl UserAndTimestamp {
    /// Record `user` acting now
    pub fn of(user: &str) -> Self {
        Self {
            user: user.to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl std::fmt::Display for UserAndTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.user, self.timestamp.to_rfc3339())
    }
}
