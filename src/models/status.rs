use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle of a PunchEntry.
///
/// `active` → `completed` on punch-out, then `approved` or `rejected` by an
/// approver. Auto-approve roles go straight from `active` to `approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Active,
    Completed,
    Approved,
    Rejected,
}

impl EntryStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EntryStatus::Active => "active",
            EntryStatus::Completed => "completed",
            EntryStatus::Approved => "approved",
            EntryStatus::Rejected => "rejected",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(EntryStatus::Active),
            "completed" => Some(EntryStatus::Completed),
            "approved" => Some(EntryStatus::Approved),
            "rejected" => Some(EntryStatus::Rejected),
            _ => None,
        }
    }

    /// Short label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Active => "in progress",
            EntryStatus::Completed => "pending",
            EntryStatus::Approved => "approved",
            EntryStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl FromStr for EntryStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryStatus::from_db_str(&s.to_lowercase()).ok_or_else(|| AppError::InvalidStatus(s.into()))
    }
}
