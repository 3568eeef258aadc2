//! 排班解析 (Assignment Resolver)
//!
//! 根据报告的 (日期, 现场名, 作业编号, 地点) 查找外部排班表中的作业员。
//! 只用于读侧筛选，不参与状态迁移。
//!
//! - [`matcher`]: 五步匹配规则
//! - [`source`]: 外部排班数据源
//! - [`AssignmentResolver`]: 按日期缓存 + 并发合并

pub mod matcher;
pub mod source;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use shared::models::{Assignment, AssignmentQuery, AssignmentRow, Report};
use shared::util::normalize_key;

use crate::utils::{AppError, AppResult};
pub use source::{AssignmentSource, HttpAssignmentSource, SourceError, StaticAssignmentSource};

/// Dates kept in the cache at most
const MAX_CACHED_DATES: u64 = 366;

/// Per-date cached view over an [`AssignmentSource`]
#[derive(Clone)]
pub struct AssignmentResolver {
    source: Arc<dyn AssignmentSource>,
    cache: Cache<String, Arc<Vec<AssignmentRow>>>,
}

impl std::fmt::Debug for AssignmentResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssignmentResolver")
            .field("cached_dates", &self.cache.entry_count())
            .finish()
    }
}

impl AssignmentResolver {
    pub fn new(source: Arc<dyn AssignmentSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: Cache::builder()
                .max_capacity(MAX_CACHED_DATES)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Rows of one date; concurrent misses for the same date share one fetch.
    /// Failed fetches are not cached.
    pub async fn rows_for(&self, date: &str) -> AppResult<Arc<Vec<AssignmentRow>>> {
        let source = self.source.clone();
        let key = date.to_string();
        self.cache
            .try_get_with(date.to_string(), async move {
                let rows = source.fetch(&key).await?;
                tracing::debug!(date = %key, rows = rows.len(), "Assignment rows loaded");
                Ok::<_, SourceError>(Arc::new(rows))
            })
            .await
            .map_err(|e| {
                tracing::warn!(date = %date, error = %e, "Assignment source unavailable");
                AppError::assignment_unavailable(e.to_string())
            })
    }

    pub async fn resolve(&self, query: &AssignmentQuery) -> AppResult<Assignment> {
        let rows = self.rows_for(&query.date).await?;
        Ok(matcher::resolve(&rows, query))
    }

    /// Whether the report's slot is assigned to `staff_name` (normalized compare)
    ///
    /// The report's `site_code` doubles as the external job identifier.
    pub async fn belongs_to(&self, report: &Report, staff_name: &str) -> AppResult<bool> {
        let query = AssignmentQuery {
            date: report.report_date.clone(),
            site_name: report.site_name.clone(),
            job_id: report.site_code.clone(),
            location: report.location.clone(),
        };
        let wanted = normalize_key(staff_name);
        Ok(self
            .resolve(&query)
            .await?
            .staff_name()
            .is_some_and(|assigned| !wanted.is_empty() && normalize_key(assigned) == wanted))
    }

    /// Drop every cached date (after an ingestion resync)
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
        tracing::info!("Assignment cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::models::{MatchRule, ReportStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn row(date: &str, site: &str, staff: &str) -> AssignmentRow {
        AssignmentRow {
            date: date.into(),
            job_id: None,
            site_name: site.into(),
            location: None,
            staff_name: staff.into(),
        }
    }

    /// Counts fetches; the first `failures` calls fail
    struct CountingSource {
        rows: Vec<AssignmentRow>,
        calls: AtomicUsize,
        failures: usize,
    }

    #[async_trait]
    impl AssignmentSource for CountingSource {
        async fn fetch(&self, date: &str) -> Result<Vec<AssignmentRow>, SourceError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            if n < self.failures {
                return Err(SourceError::Status(502));
            }
            Ok(self.rows.iter().filter(|r| r.date == date).cloned().collect())
        }
    }

    fn counting(failures: usize) -> Arc<CountingSource> {
        Arc::new(CountingSource {
            rows: vec![row("2025-11-01", "SiteA", "Taro")],
            calls: AtomicUsize::new(0),
            failures,
        })
    }

    fn query(site: &str) -> AssignmentQuery {
        AssignmentQuery {
            date: "2025-11-01".into(),
            site_name: site.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_fetch() {
        let source = counting(0);
        let resolver = AssignmentResolver::new(source.clone(), Duration::from_secs(60));

        let q = query("Site A");
        let (a, b) = tokio::join!(resolver.resolve(&q), resolver.resolve(&q));
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        resolver.resolve(&q).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        resolver.invalidate();
        resolver.resolve(&q).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_spacing_variant_resolves() {
        let resolver = AssignmentResolver::new(counting(0), Duration::from_secs(60));
        let result = resolver.resolve(&query("Site A")).await.unwrap();
        assert_eq!(
            result,
            Assignment::Assigned {
                staff_name: "Taro".into(),
                matched_by: MatchRule::SiteName,
            }
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let source = counting(1);
        let resolver = AssignmentResolver::new(source.clone(), Duration::from_secs(60));

        let err = resolver.resolve(&query("SiteA")).await.unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::AssignmentSourceUnavailable);

        assert!(resolver.resolve(&query("SiteA")).await.is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_belongs_to_normalizes_staff_name() {
        let resolver = AssignmentResolver::new(counting(0), Duration::from_secs(60));
        let report = Report {
            id: 1,
            report_date: "2025-11-01".into(),
            site_id: None,
            site_code: None,
            site_name: "Site A".into(),
            site_key: "sitea".into(),
            location: None,
            chief_name: None,
            status: ReportStatus::ChiefSubmittedToSales,
            staff_report_content: None,
            chief_report_content: None,
            sales_comment: None,
            accounting_comment: None,
            return_reason: None,
            created_by: None,
            updated_by: None,
            created_at: 0,
            updated_at: 0,
        };

        assert!(resolver.belongs_to(&report, " taro ").await.unwrap());
        assert!(!resolver.belongs_to(&report, "Hanako").await.unwrap());
        assert!(!resolver.belongs_to(&report, "").await.unwrap());
    }
}
