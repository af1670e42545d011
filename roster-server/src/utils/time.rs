//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 API/bot 层完成，
//! repository 层只接收 `i64` Unix millis。
//!
//! The chain runs in a single business timezone, configured as a fixed
//! UTC offset (`TZ_OFFSET_MINUTES`).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析时刻字符串 (HH:MM)，用于营业时间
pub fn parse_hhmm(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time of day: {value} (expected HH:MM)")))
}

/// 业务时区 (固定 UTC 偏移)
pub fn business_offset(offset_minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(offset_minutes * 60)
        .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
}

/// Unix millis → 业务时区挂钟时间
pub fn to_local(millis: i64, offset_minutes: i32) -> NaiveDateTime {
    let tz = business_offset(offset_minutes);
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&tz).naive_local())
        .unwrap_or_default()
}

/// 日期 + 挂钟时间 → Unix millis (业务时区)
pub fn local_to_millis(date: NaiveDate, time: NaiveTime, offset_minutes: i32) -> i64 {
    let tz = business_offset(offset_minutes);
    let naive = date.and_time(time);
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, offset_minutes: i32) -> i64 {
    local_to_millis(date, NaiveTime::MIN, offset_minutes)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, offset_minutes: i32) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    local_to_millis(next_day, NaiveTime::MIN, offset_minutes)
}

/// 格式化时间段，用于通知和 bot 消息: "05.08.2026 09:00-13:00"
pub fn format_window(start_millis: i64, end_millis: i64, offset_minutes: i32) -> String {
    let start = to_local(start_millis, offset_minutes);
    let end = to_local(end_millis, offset_minutes);
    format!(
        "{} {}-{}",
        start.format("%d.%m.%Y"),
        start.format("%H:%M"),
        end.format("%H:%M")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hhmm() {
        assert_eq!(
            parse_hhmm("08:30").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert!(parse_hhmm("8h30").is_err());
        assert!(parse_hhmm("25:00").is_err());
    }

    #[test]
    fn local_round_trip_with_offset() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let millis = local_to_millis(date, time, 180); // UTC+3
        let local = to_local(millis, 180);
        assert_eq!(local.date(), date);
        assert_eq!(local.time(), time);
        // Same instant read at UTC is three hours earlier
        let utc = to_local(millis, 0);
        assert_eq!(utc.time(), NaiveTime::from_hms_opt(6, 0, 0).unwrap());
    }

    #[test]
    fn day_bounds_cover_24_hours() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let start = day_start_millis(date, 0);
        let end = day_end_millis(date, 0);
        assert_eq!(end - start, 24 * 3_600_000);
    }

    #[test]
    fn formats_window() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let start = local_to_millis(date, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), 0);
        let end = local_to_millis(date, NaiveTime::from_hms_opt(13, 0, 0).unwrap(), 0);
        assert_eq!(format_window(start, end, 0), "05.08.2026 09:00-13:00");
    }
}
