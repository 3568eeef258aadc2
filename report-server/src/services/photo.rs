//! Photo Store
//!
//! 附件的上传和过期清理由外部协作方负责，这里只读取附件列表，
//! 并在报告删除后清理对应的记录和文件。

use std::path::PathBuf;

use async_trait::async_trait;
use shared::models::ReportPhoto;
use shared::util::now_millis;
use sqlx::SqlitePool;
use tokio::fs;

use crate::db::repository::{RepoResult, photo};

/// Report-scoped attachment collaborator
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Non-expired attachments of a report
    async fn count(&self, report_id: i64) -> RepoResult<i64>;

    async fn list(&self, report_id: i64) -> RepoResult<Vec<ReportPhoto>>;

    /// Remove every attachment of a deleted report, returns how many were removed
    async fn delete_for_report(&self, report_id: i64) -> RepoResult<usize>;
}

/// `report_photo` table + files under `{work_dir}/photos`
#[derive(Debug, Clone)]
pub struct SqlitePhotoStore {
    pool: SqlitePool,
    photos_dir: PathBuf,
}

impl SqlitePhotoStore {
    pub fn new(pool: SqlitePool, photos_dir: PathBuf) -> Self {
        Self { pool, photos_dir }
    }

    async fn remove_file(&self, photo: &ReportPhoto) -> bool {
        let file_path = self.photos_dir.join(&photo.storage_path);
        if !file_path.exists() {
            return false;
        }
        match fs::remove_file(&file_path).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(photo_id = photo.id, path = %file_path.display(), error = %e, "Failed to delete photo file");
                false
            }
        }
    }
}

#[async_trait]
impl PhotoStore for SqlitePhotoStore {
    async fn count(&self, report_id: i64) -> RepoResult<i64> {
        photo::count_active(&self.pool, report_id, now_millis()).await
    }

    async fn list(&self, report_id: i64) -> RepoResult<Vec<ReportPhoto>> {
        photo::list_active(&self.pool, report_id, now_millis()).await
    }

    async fn delete_for_report(&self, report_id: i64) -> RepoResult<usize> {
        let removed = photo::delete_for_report(&self.pool, report_id).await?;
        let mut files = 0;
        for photo in &removed {
            if self.remove_file(photo).await {
                files += 1;
            }
        }
        if !removed.is_empty() {
            tracing::info!(report_id, rows = removed.len(), files, "Report photos removed");
        }
        Ok(removed.len())
    }
}
