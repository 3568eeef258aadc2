//! 时间工具函数 — 日期与时刻解析
//!
//! 报告日期以 `YYYY-MM-DD` 文本存储，时刻以 `HH:MM` 或 `HH:MM:SS` 文本存储。

use chrono::{NaiveDate, NaiveTime};

use super::{AppError, AppResult, ErrorCode};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("Invalid date format: {}", date),
        )
        .with_detail("field", "report_date")
    })
}

/// 规范化日期为 YYYY-MM-DD
pub fn normalize_date(date: &str) -> AppResult<String> {
    Ok(parse_date(date)?.format("%Y-%m-%d").to_string())
}

/// 解析时刻 (HH:MM 或 HH:MM:SS)
pub fn parse_time_of_day(value: &str, field: &str) -> AppResult<NaiveTime> {
    let v = value.trim();
    NaiveTime::parse_from_str(v, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(v, "%H:%M"))
        .map_err(|_| {
            AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("Invalid time format for {}: {}", field, value),
            )
            .with_detail("field", field.to_string())
        })
}
