//! Report Photo Model
//!
//! Rows are written by the upload collaborator; the service only reads
//! them and removes them with their report.

use serde::{Deserialize, Serialize};

/// Maximum attachments per report
pub const MAX_PHOTOS_PER_REPORT: i64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReportPhoto {
    pub id: i64,
    pub report_id: i64,
    pub file_name: String,
    pub storage_path: String,
    pub uploaded_by: Option<String>,
    pub created_at: i64,
    /// Unix millis after which the photo is hidden (None = never)
    pub expires_at: Option<i64>,
}

/// `GET /api/reports/{id}/photos` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSummary {
    pub photos: Vec<ReportPhoto>,
    pub count: i64,
    pub can_add: bool,
}

impl PhotoSummary {
    pub fn new(photos: Vec<ReportPhoto>) -> Self {
        let count = photos.len() as i64;
        Self {
            photos,
            count,
            can_add: count < MAX_PHOTOS_PER_REPORT,
        }
    }
}
