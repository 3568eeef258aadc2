//! 服务层 - 外部协作方适配
//!
//! # 服务列表
//!
//! - [`PhotoStore`] - 报告附件（上传/过期清理由外部负责）

pub mod photo;

pub use photo::{PhotoStore, SqlitePhotoStore};
