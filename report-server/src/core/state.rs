use std::sync::Arc;

use sqlx::SqlitePool;

use crate::assignment::{
    AssignmentResolver, AssignmentSource, HttpAssignmentSource, StaticAssignmentSource,
};
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::realtime::{Notifier, SubscriberRegistry};
use crate::services::{PhotoStore, SqlitePhotoStore};
use crate::workflow::ReportWorkflow;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc / 连接池实现浅拷贝，handler 通过 `State<ServerState>` 获取。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | workflow | ReportWorkflow | 报告读写 + 状态迁移 |
/// | resolver | AssignmentResolver | 排班解析 (按日期缓存) |
/// | registry | Arc<SubscriberRegistry> | 实时订阅表 |
/// | notifier | Notifier | 实时事件发布 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    pub workflow: ReportWorkflow,
    pub resolver: AssignmentResolver,
    pub registry: Arc<SubscriberRegistry>,
    pub notifier: Notifier,
}

impl ServerState {
    /// 由已打开的数据库和排班数据源组装状态
    ///
    /// 测试直接使用此方法注入内存数据库和静态数据源。
    pub fn new(config: Config, db: DbService, source: Arc<dyn AssignmentSource>) -> Self {
        let registry = Arc::new(SubscriberRegistry::new(config.realtime_channel_capacity));
        let notifier = Notifier::new(registry.clone());
        let photos: Arc<dyn PhotoStore> =
            Arc::new(SqlitePhotoStore::new(db.pool.clone(), config.photos_dir()));
        let workflow = ReportWorkflow::new(
            db.pool.clone(),
            notifier.clone(),
            photos,
            config.transition_policy(),
        );
        let resolver = AssignmentResolver::new(source, config.assignment_cache_ttl());

        Self {
            config,
            pool: db.pool,
            workflow,
            resolver,
            registry,
            notifier,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (默认 work_dir/database/reports.db，执行迁移)
    /// 3. 排班数据源 (未配置 URL 时为空数据源)
    pub async fn initialize(config: &Config) -> Result<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| ServerError::Config(format!("Failed to create work directory: {}", e)))?;

        let db_path = config.database_file();
        let db = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;
        tracing::info!(path = %db_path.display(), "Database ready");

        let source: Arc<dyn AssignmentSource> = match &config.assignment_source_url {
            Some(url) => {
                tracing::info!(url = %url, "Using HTTP assignment source");
                Arc::new(
                    HttpAssignmentSource::new(url.clone(), config.assignment_fetch_timeout())
                        .map_err(|e| ServerError::Config(e.to_string()))?,
                )
            }
            None => {
                tracing::warn!("ASSIGNMENT_SOURCE_URL not set, every lookup resolves to unassigned");
                Arc::new(StaticAssignmentSource::default())
            }
        };

        Ok(Self::new(config.clone(), db, source))
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}
