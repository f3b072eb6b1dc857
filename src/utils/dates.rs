//! 日期工具
//!
//! 日历日期统一使用 ISO `YYYY-MM-DD` 字符串，星期从周一 = 1 开始。

use chrono::{Datelike, Duration, NaiveDate};

use crate::errors::{Result, SchoolSysError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| SchoolSysError::date_parse(format!("无效日期 '{value}': {e}")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 星期几（周一 = 1）
pub fn weekday_number(date: NaiveDate) -> i32 {
    date.weekday().number_from_monday() as i32
}

/// 包含该日期的一周（周一至周日）
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (monday, monday + Duration::days(6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        let date = parse_date("2026-09-07").unwrap();
        assert_eq!(format_date(date), "2026-09-07");
        assert!(parse_date("2026-13-01").is_err());
        assert!(parse_date("07/09/2026").is_err());
    }

    #[test]
    fn test_week_bounds_are_monday_anchored() {
        // 2026-09-10 是周四
        let thursday = parse_date("2026-09-10").unwrap();
        assert_eq!(weekday_number(thursday), 4);
        let (start, end) = week_bounds(thursday);
        assert_eq!(format_date(start), "2026-09-07");
        assert_eq!(format_date(end), "2026-09-13");

        let monday = parse_date("2026-09-07").unwrap();
        assert_eq!(week_bounds(monday).0, monday);
        let sunday = parse_date("2026-09-13").unwrap();
        assert_eq!(week_bounds(sunday).0, monday);
    }
}
