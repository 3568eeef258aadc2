//! Site Master Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Site {
    pub id: i64,
    pub code: Option<String>,
    pub name: String,
    /// Normalized name used for lookups
    pub name_key: String,
    pub location: Option<String>,
}
