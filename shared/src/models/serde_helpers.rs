//! Common serde helpers for partial-update payloads

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "explicit null"
///
/// Used together with `#[serde(default)]`:
/// - field absent → `None`
/// - field `null` → `Some(None)`
/// - field value → `Some(Some(v))`
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize bool that treats null as false
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(false))
}
