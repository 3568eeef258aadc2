//! Staff Entry Model (作業員ごとの報告)

use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// Per-staff row of a report, unique by (report_id, staff_name)
///
/// `staff_name` is compared exactly: no trimming, case-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReportStaffEntry {
    pub id: i64,
    pub report_id: i64,
    pub staff_name: String,
    pub report_content: Option<String>,
    pub driving_allowance: bool,
    pub laundry_allowance: bool,
    pub partition_allowance: bool,
    pub warehouse_allowance: bool,
    pub accommodation_allowance: bool,
    pub is_selected: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Upsert payload; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffEntryUpsert {
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub report_content: Option<Option<String>>,
    pub driving_allowance: Option<bool>,
    pub laundry_allowance: Option<bool>,
    pub partition_allowance: Option<bool>,
    pub warehouse_allowance: Option<bool>,
    pub accommodation_allowance: Option<bool>,
    pub is_selected: Option<bool>,
}

impl StaffEntryUpsert {
    /// Provided allowance/selection flags as (column, value) pairs
    pub fn flag_columns(&self) -> Vec<(&'static str, bool)> {
        [
            ("driving_allowance", self.driving_allowance),
            ("laundry_allowance", self.laundry_allowance),
            ("partition_allowance", self.partition_allowance),
            ("warehouse_allowance", self.warehouse_allowance),
            ("accommodation_allowance", self.accommodation_allowance),
            ("is_selected", self.is_selected),
        ]
        .into_iter()
        .filter_map(|(col, v)| v.map(|b| (col, b)))
        .collect()
    }
}
