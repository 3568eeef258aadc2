use std::path::PathBuf;
use std::time::Duration;

use crate::workflow::TransitionPolicy;

/// 服务器配置 - 日报服务的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | DATABASE_PATH | WORK_DIR/database/reports.db | SQLite 路径 |
/// | HTTP_PORT | 3000 | HTTP / WebSocket 端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 滚动日志目录 |
/// | ASSIGNMENT_SOURCE_URL | (无) | 排班数据源地址 |
/// | ASSIGNMENT_CACHE_TTL_SECS | 600 | 排班缓存时长 |
/// | ASSIGNMENT_FETCH_TIMEOUT_MS | 10000 | 排班拉取超时 |
/// | STRICT_TRANSITIONS | false | 启用状态迁移白名单 |
/// | REALTIME_CHANNEL_CAPACITY | 64 | 每连接推送缓冲 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/reports HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// 显式数据库路径 (覆盖 work_dir 推导)
    pub database_path: Option<String>,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志目录 (存在时写入滚动日志文件)
    pub log_dir: Option<String>,
    /// 排班数据源 (外部表格同步服务)，未设置时所有查询返回 unassigned
    pub assignment_source_url: Option<String>,
    /// 排班缓存时长 (秒)
    pub assignment_cache_ttl_secs: u64,
    /// 排班拉取超时 (毫秒)
    pub assignment_fetch_timeout_ms: u64,
    /// 是否启用严格状态迁移
    pub strict_transitions: bool,
    /// 每个 WebSocket 连接的推送缓冲容量
    pub realtime_channel_capacity: usize,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            database_path: std::env::var("DATABASE_PATH").ok().filter(|p| !p.is_empty()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|p| !p.is_empty()),
            assignment_source_url: std::env::var("ASSIGNMENT_SOURCE_URL")
                .ok()
                .filter(|u| !u.is_empty()),
            assignment_cache_ttl_secs: std::env::var("ASSIGNMENT_CACHE_TTL_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(600),
            assignment_fetch_timeout_ms: std::env::var("ASSIGNMENT_FETCH_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10_000),
            strict_transitions: std::env::var("STRICT_TRANSITIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            realtime_channel_capacity: std::env::var("REALTIME_CHANNEL_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|c: &usize| *c > 0)
                .unwrap_or(64),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = None;
        config.http_port = http_port;
        config
    }

    /// 数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// SQLite 文件路径
    pub fn database_file(&self) -> PathBuf {
        match &self.database_path {
            Some(p) => PathBuf::from(p),
            None => self.database_dir().join("reports.db"),
        }
    }

    /// 确保工作目录结构存在
    /// Attachment files written by the upload collaborator
    pub fn photos_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("photos")
    }

    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.photos_dir())?;
        if let Some(parent) = self.database_file().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn transition_policy(&self) -> TransitionPolicy {
        if self.strict_transitions {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Lenient
        }
    }

    pub fn assignment_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.assignment_cache_ttl_secs)
    }

    pub fn assignment_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.assignment_fetch_timeout_ms)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
