//! Daily Work Report Model (现场日报)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::comment::ReportComment;
use super::report_time::ReportTime;
use super::role::Role;
use super::serde_helpers;
use super::staff_entry::ReportStaffEntry;
use crate::error::AppError;

/// Report status (seven literals, stored as TEXT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum ReportStatus {
    Draft,
    StaffSubmitted,
    ChiefSubmittedToSales,
    ReturnedBySales,
    SubmittedToAccounting,
    ReturnedByAccounting,
    Completed,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 7] = [
        ReportStatus::Draft,
        ReportStatus::StaffSubmitted,
        ReportStatus::ChiefSubmittedToSales,
        ReportStatus::ReturnedBySales,
        ReportStatus::SubmittedToAccounting,
        ReportStatus::ReturnedByAccounting,
        ReportStatus::Completed,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::StaffSubmitted => "staff_submitted",
            ReportStatus::ChiefSubmittedToSales => "chief_submitted_to_sales",
            ReportStatus::ReturnedBySales => "returned_by_sales",
            ReportStatus::SubmittedToAccounting => "submitted_to_accounting",
            ReportStatus::ReturnedByAccounting => "returned_by_accounting",
            ReportStatus::Completed => "completed",
        }
    }

    /// Roles that currently own the report (admin is implied everywhere)
    pub const fn editable_by(&self) -> &'static [Role] {
        match self {
            ReportStatus::Draft => &[Role::Staff, Role::Chief],
            ReportStatus::StaffSubmitted => &[Role::Chief],
            ReportStatus::ChiefSubmittedToSales => &[Role::Sales],
            ReportStatus::ReturnedBySales => &[Role::Staff, Role::Chief],
            ReportStatus::SubmittedToAccounting => &[Role::Accounting],
            ReportStatus::ReturnedByAccounting => &[Role::Sales],
            ReportStatus::Completed => &[],
        }
    }

    /// Documented successors of this status
    pub const fn allowed_next(&self) -> &'static [ReportStatus] {
        match self {
            ReportStatus::Draft => &[ReportStatus::StaffSubmitted],
            ReportStatus::StaffSubmitted => {
                &[ReportStatus::ChiefSubmittedToSales, ReportStatus::Draft]
            }
            ReportStatus::ChiefSubmittedToSales => &[
                ReportStatus::ReturnedBySales,
                ReportStatus::SubmittedToAccounting,
            ],
            ReportStatus::ReturnedBySales => &[ReportStatus::StaffSubmitted],
            ReportStatus::SubmittedToAccounting => {
                &[ReportStatus::ReturnedByAccounting, ReportStatus::Completed]
            }
            ReportStatus::ReturnedByAccounting => &[
                ReportStatus::SubmittedToAccounting,
                ReportStatus::ChiefSubmittedToSales,
            ],
            ReportStatus::Completed => &[],
        }
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| AppError::invalid_status(s))
    }
}

/// Report header row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Report {
    pub id: i64,
    /// Work date (YYYY-MM-DD)
    pub report_date: String,
    pub site_id: Option<i64>,
    pub site_code: Option<String>,
    pub site_name: String,
    /// Normalized site name (natural-key component)
    pub site_key: String,
    pub location: Option<String>,
    pub chief_name: Option<String>,
    pub status: ReportStatus,
    pub staff_report_content: Option<String>,
    pub chief_report_content: Option<String>,
    pub sales_comment: Option<String>,
    pub accounting_comment: Option<String>,
    pub return_reason: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Full report aggregate returned by `GET /api/reports/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDetail {
    #[serde(flatten)]
    pub report: Report,
    pub time: Option<ReportTime>,
    pub staff_entries: Vec<ReportStaffEntry>,
    pub photo_count: i64,
}

/// Find-or-create payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportCreate {
    /// Work date (YYYY-MM-DD)
    pub report_date: String,
    pub site_name: String,
    pub site_code: Option<String>,
    pub site_id: Option<i64>,
    pub location: Option<String>,
    pub chief_name: Option<String>,
}

/// Partial update payload
///
/// Unknown fields are ignored. Nullable columns use a double option so
/// an explicit `null` clears the value while an absent field is untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportUpdate {
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub site_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub site_code: Option<Option<String>>,
    pub site_name: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub chief_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub staff_report_content: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub chief_report_content: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub sales_comment: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub accounting_comment: Option<Option<String>>,
}

impl ReportUpdate {
    /// Drop role-owned content fields the given role may not write
    pub fn retain_owned_by(mut self, role: Role) -> Self {
        if role == Role::Admin {
            return self;
        }
        if role != Role::Staff {
            self.staff_report_content = None;
        }
        if role != Role::Chief {
            self.chief_report_content = None;
        }
        if role != Role::Sales {
            self.sales_comment = None;
        }
        if role != Role::Accounting {
            self.accounting_comment = None;
        }
        self
    }
}

/// Status transition payload
///
/// `status` stays a string so unknown literals fail with a validation
/// error instead of a body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTransition {
    pub status: String,
    pub reason: Option<String>,
}

/// Result of a committed status transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub report: Report,
    pub previous_status: ReportStatus,
    pub comments: Vec<ReportComment>,
}
