//! Shared types for the daily report workflow
//!
//! Common types used by the server and its clients: data models,
//! realtime message types, the unified error system and small utilities.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode, ErrorResponse};
pub use message::{ClientCommand, RealtimeEvent, Topic};
