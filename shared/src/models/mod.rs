//! Data models
//!
//! Shared between report-server and clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod assignment;
pub mod comment;
pub mod photo;
pub mod report;
pub mod report_time;
pub mod role;
pub mod serde_helpers;
pub mod site;
pub mod staff_entry;

// Re-exports
pub use assignment::*;
pub use comment::*;
pub use photo::*;
pub use report::*;
pub use report_time::*;
pub use role::*;
pub use site::*;
pub use staff_entry::*;
