use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

/// 北京时区固定 UTC+8（Asia/Shanghai 无夏令时）
pub fn beijing_offset() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).expect("UTC+8 is a valid offset")
}

pub fn to_beijing(dt: DateTime<Utc>) -> DateTime<FixedOffset> {
    dt.with_timezone(&beijing_offset())
}

/// 某一时刻对应的北京自然日
pub fn today_beijing(now: DateTime<Utc>) -> NaiveDate {
    to_beijing(now).date_naive()
}

pub fn yesterday_beijing(now: DateTime<Utc>) -> NaiveDate {
    today_beijing(now) - Duration::days(1)
}

/// 目标日期所在 ISO 周的周一与周日
pub fn week_start_end(target: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = target - Duration::days(target.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

/// 上一个完整自然周（周抽奖总是回溯已结束的一周）
pub fn previous_week_start_end(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    week_start_end(today - Duration::days(7))
}

/// 解析 "HH:MM" 形式的开奖时间，非法输入回退到 00:00
pub fn parse_hhmm(raw: &str) -> NaiveTime {
    NaiveTime::parse_from_str(raw, "%H:%M").unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_week_start_end_midweek() {
        // 2025-10-08 是周三，所在周为 10-06(一) ~ 10-12(日)
        let target = NaiveDate::from_ymd_opt(2025, 10, 8).unwrap();
        let (start, end) = week_start_end(target);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 10, 6).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 10, 12).unwrap());
    }

    #[test]
    fn test_week_start_end_monday_and_sunday() {
        let monday = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2025, 10, 12).unwrap();
        assert_eq!(week_start_end(monday), (monday, sunday));
        assert_eq!(week_start_end(sunday), (monday, sunday));
    }

    #[test]
    fn test_previous_week() {
        // 周一开奖时回溯的是刚刚结束的一周
        let monday = NaiveDate::from_ymd_opt(2025, 10, 13).unwrap();
        let (start, end) = previous_week_start_end(monday);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 10, 6).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 10, 12).unwrap());
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(
            parse_hhmm("09:30"),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(parse_hhmm("not a time"), NaiveTime::MIN);
    }

    #[test]
    fn test_beijing_date_rollover() {
        // UTC 16:00 = 北京时间次日 00:00
        let utc = Utc.with_ymd_and_hms(2025, 10, 7, 16, 0, 0).unwrap();
        assert_eq!(
            today_beijing(utc),
            NaiveDate::from_ymd_opt(2025, 10, 8).unwrap()
        );
        let utc = Utc.with_ymd_and_hms(2025, 10, 7, 15, 59, 59).unwrap();
        assert_eq!(
            today_beijing(utc),
            NaiveDate::from_ymd_opt(2025, 10, 7).unwrap()
        );
    }
}
