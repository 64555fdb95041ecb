use chrono::{NaiveDate, NaiveDateTime};

const NOW_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// 解析 `--now` 參數
pub fn parse_now(value: &str) -> Result<NaiveDateTime, String> {
    NOW_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
        .ok_or_else(|| format!("'{}' is not a local time like 2024-01-05T08:05", value))
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| format!("'{}' is not a date like 2024-01-05: {}", value, e))
}
