//! Report Time Model (集合/到着/終了/出発 時刻)

use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// Time record, 1:1 with a report, created lazily
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReportTime {
    pub report_id: i64,
    /// Time of day (HH:MM or HH:MM:SS)
    pub meeting_time: Option<String>,
    pub arrival_time: Option<String>,
    pub finish_time: Option<String>,
    pub departure_time: Option<String>,
    pub updated_at: i64,
}

/// Upsert payload; each field is independently settable and clearable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportTimeUpdate {
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub meeting_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub arrival_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub finish_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "serde_helpers::double_option")]
    pub departure_time: Option<Option<String>>,
}

impl ReportTimeUpdate {
    /// Provided fields as (column, value) pairs
    pub fn columns(&self) -> Vec<(&'static str, Option<&str>)> {
        [
            ("meeting_time", &self.meeting_time),
            ("arrival_time", &self.arrival_time),
            ("finish_time", &self.finish_time),
            ("departure_time", &self.departure_time),
        ]
        .into_iter()
        .filter_map(|(col, v)| v.as_ref().map(|inner| (col, inner.as_deref())))
        .collect()
    }
}
