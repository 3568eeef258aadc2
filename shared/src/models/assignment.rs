//! Staff Assignment Model (from the external spreadsheet ingestion)

use serde::{Deserialize, Serialize};

/// One assignment row as delivered by the ingestion collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    /// Work date (YYYY-MM-DD)
    pub date: String,
    /// External job / lot identifier
    pub job_id: Option<String>,
    pub site_name: String,
    pub location: Option<String>,
    pub staff_name: String,
}

/// Lookup key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentQuery {
    pub date: String,
    pub site_name: String,
    pub job_id: Option<String>,
    pub location: Option<String>,
}

/// Which rule produced a match (priority order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    JobId,
    SiteAndLocation,
    SiteName,
    Fuzzy,
}

/// Resolver answer; no match is a value, not an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assignment {
    Assigned {
        staff_name: String,
        matched_by: MatchRule,
    },
    Unassigned,
}

impl Assignment {
    pub fn staff_name(&self) -> Option<&str> {
        match self {
            Assignment::Assigned { staff_name, .. } => Some(staff_name),
            Assignment::Unassigned => None,
        }
    }
}
