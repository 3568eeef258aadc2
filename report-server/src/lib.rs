//! Report Server - 现场日报审批工作流服务
//!
//! # 架构概述
//!
//! 日报按 staff → chief → sales → accounting 的顺序流转：
//!
//! - **工作流** (`workflow`): 报告读写、find-or-create、状态迁移 + 审计评论
//! - **数据库** (`db`): SQLite (sqlx)，迁移脚本位于 `migrations/`
//! - **排班解析** (`assignment`): 外部排班表查询，按日期缓存
//! - **实时推送** (`realtime`): 按报告 / 角色订阅的 WebSocket 推送
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! report-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── auth/          # 操作者身份提取
//! ├── workflow/      # 报告存储 + 状态迁移引擎
//! ├── assignment/    # 排班解析
//! ├── realtime/      # 订阅表 + 事件发布
//! ├── services/      # 外部协作方 (附件)
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、时间、校验
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod assignment;
pub mod auth;
pub mod core;
pub mod db;
pub mod realtime;
pub mod services;
pub mod utils;
pub mod workflow;

// Re-export 公共类型
pub use assignment::AssignmentResolver;
pub use auth::CurrentActor;
pub use core::{Config, Server, ServerState};
pub use realtime::{Notifier, SubscriberRegistry};
pub use utils::{AppError, AppResult};
pub use workflow::{ReportWorkflow, TransitionPolicy};

// Re-export unified error types from shared
pub use utils::{ErrorCategory, ErrorCode, ErrorResponse};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 .env 并初始化日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 缺失时使用进程环境变量
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    let json = std::env::var("LOG_JSON")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(Some(&log_level), Some(json), log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____                        __
   / __ \___  ____  ____  _____/ /_
  / /_/ / _ \/ __ \/ __ \/ ___/ __/
 / _, _/  __/ /_/ / /_/ / /  / /_
/_/ |_|\___/ .___/\____/_/   \__/
          /_/
    "#
    );
}
