//! Assignment sources (排班数据源)

use std::time::Duration;

use async_trait::async_trait;
use shared::models::AssignmentRow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Assignment source request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Assignment source returned status {0}")]
    Status(u16),
}

/// Output of the spreadsheet ingestion collaborator
#[async_trait]
pub trait AssignmentSource: Send + Sync {
    /// All assignment rows of one date (YYYY-MM-DD)
    async fn fetch(&self, date: &str) -> Result<Vec<AssignmentRow>, SourceError>;
}

/// `GET {base}/assignments?date=YYYY-MM-DD` returning a JSON array
#[derive(Debug, Clone)]
pub struct HttpAssignmentSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAssignmentSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AssignmentSource for HttpAssignmentSource {
    async fn fetch(&self, date: &str) -> Result<Vec<AssignmentRow>, SourceError> {
        let resp = self
            .client
            .get(format!("{}/assignments", self.base_url))
            .query(&[("date", date)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status().as_u16()));
        }

        Ok(resp.json::<Vec<AssignmentRow>>().await?)
    }
}

/// In-memory rows; used when no ingestion URL is configured
#[derive(Debug, Clone, Default)]
pub struct StaticAssignmentSource {
    rows: Vec<AssignmentRow>,
}

impl StaticAssignmentSource {
    pub fn new(rows: Vec<AssignmentRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl AssignmentSource for StaticAssignmentSource {
    async fn fetch(&self, date: &str) -> Result<Vec<AssignmentRow>, SourceError> {
        Ok(self.rows.iter().filter(|r| r.date == date).cloned().collect())
    }
}
