use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Areas of the application a user can be allowed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Punch,
    MyHours,
    Approvals,
    Timesheet,
    Active,
    Settings,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Punch => "punch",
            Page::MyHours => "my-hours",
            Page::Approvals => "approvals",
            Page::Timesheet => "timesheet",
            Page::Active => "active",
            Page::Settings => "settings",
        }
    }
}

impl FromStr for Page {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "punch" => Ok(Page::Punch),
            "my-hours" | "hours" => Ok(Page::MyHours),
            "approvals" => Ok(Page::Approvals),
            "timesheet" => Ok(Page::Timesheet),
            "active" => Ok(Page::Active),
            "settings" => Ok(Page::Settings),
            other => Err(AppError::InvalidPage(other.to_string())),
        }
    }
}
