use crate::models::{
    AttendanceMap, AttendanceRecord, AttendanceStatus, CurrentStatus, KnownDay,
};
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use std::collections::BTreeMap;

const WINDOW_DAYS: i64 = 365;

/// Formats from the local calendar components, never through a UTC conversion.
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// `[today - 364 days rolled back to Sunday, today]`.
pub fn rolling_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Duration::days(WINDOW_DAYS - 1);
    (week_start(start), today)
}

pub fn fallback_record(date: NaiveDate) -> AttendanceRecord {
    if is_weekend(date) {
        AttendanceRecord::new(AttendanceStatus::Weekend, 0.0)
    } else {
        AttendanceRecord::new(AttendanceStatus::Absent, 0.0)
    }
}

pub fn known_records(days: BTreeMap<String, KnownDay>) -> AttendanceMap {
    days.into_iter()
        .map(|(date, day)| {
            let record = AttendanceRecord::new(day.status, day.hours_worked.unwrap_or(0.0));
            (date, record)
        })
        .collect()
}

/// Only a logged-in status counts as live attendance for today.
pub fn live_today(status: &CurrentStatus) -> Option<AttendanceRecord> {
    if !status.logged_in {
        return None;
    }
    let record_status = status.status?;
    Some(AttendanceRecord::new(
        record_status,
        status.total_hours.unwrap_or(0.0),
    ))
}

/// Builds one record per date in `[start, end]`. Known records are copied,
/// missing days fall back to weekend/absent, and the live record wins for `today`.
pub fn build_attendance_map(
    start: NaiveDate,
    end: NaiveDate,
    known: &AttendanceMap,
    today: NaiveDate,
    live: Option<AttendanceRecord>,
) -> AttendanceMap {
    let mut map = AttendanceMap::new();
    let mut date = start;
    while date <= end {
        let key = date_key(date);
        let mut record = known
            .get(&key)
            .copied()
            .unwrap_or_else(|| fallback_record(date));
        if date == today {
            if let Some(live) = live {
                record = live;
            }
        }
        map.insert(key, record);
        date += Duration::days(1);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_key_is_zero_padded() {
        assert_eq!(date_key(ymd(2026, 3, 7)), "2026-03-07");
        assert_eq!(parse_date_key("2026-03-07"), Some(ymd(2026, 3, 7)));
        assert_eq!(parse_date_key("2026-3-7x"), None);
    }

    #[test]
    fn window_starts_on_sunday_and_covers_a_year() {
        let today = ymd(2026, 10, 18);
        let (start, end) = rolling_window(today);
        assert_eq!(end, today);
        assert_eq!(start.weekday(), Weekday::Sun);
        assert!((end - start).num_days() >= 364);
        assert!((end - start).num_days() < 371);
    }

    #[test]
    fn window_keeps_a_sunday_start() {
        // 2025-10-19 is a Sunday, exactly 364 days before 2026-10-18.
        let (start, _) = rolling_window(ymd(2026, 10, 18));
        assert_eq!(start, ymd(2025, 10, 19));
    }

    #[test]
    fn map_covers_every_date_exactly_once() {
        let start = ymd(2026, 1, 1);
        for len in 0..40i64 {
            let end = start + Duration::days(len);
            let map = build_attendance_map(start, end, &AttendanceMap::new(), end, None);
            assert_eq!(map.len() as i64, len + 1);
            assert_eq!(map.keys().next().unwrap(), &date_key(start));
            assert_eq!(map.keys().last().unwrap(), &date_key(end));
        }
    }

    #[test]
    fn missing_days_fall_back_by_weekday() {
        // 2026-01-03 Saturday, 2026-01-04 Sunday, 2026-01-05 Monday.
        let map = build_attendance_map(
            ymd(2026, 1, 3),
            ymd(2026, 1, 5),
            &AttendanceMap::new(),
            ymd(2026, 1, 10),
            None,
        );
        assert_eq!(map["2026-01-03"].status, AttendanceStatus::Weekend);
        assert_eq!(map["2026-01-04"].status, AttendanceStatus::Weekend);
        assert_eq!(map["2026-01-05"].status, AttendanceStatus::Absent);
        assert_eq!(map["2026-01-05"].hours_worked, 0.0);
    }

    #[test]
    fn known_records_are_copied_verbatim() {
        let mut known = AttendanceMap::new();
        known.insert(
            "2026-01-03".to_string(),
            AttendanceRecord::new(AttendanceStatus::Present, 5.5),
        );
        let map = build_attendance_map(ymd(2026, 1, 1), ymd(2026, 1, 5), &known, ymd(2026, 1, 9), None);
        assert_eq!(map["2026-01-03"], AttendanceRecord::new(AttendanceStatus::Present, 5.5));
    }

    #[test]
    fn known_records_outside_the_window_are_ignored() {
        let mut known = AttendanceMap::new();
        known.insert(
            "2025-12-01".to_string(),
            AttendanceRecord::new(AttendanceStatus::Present, 8.0),
        );
        let map = build_attendance_map(ymd(2026, 1, 1), ymd(2026, 1, 2), &known, ymd(2026, 1, 2), None);
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("2025-12-01"));
    }

    #[test]
    fn live_today_overrides_known_and_fallback() {
        let today = ymd(2026, 1, 5);
        let live = AttendanceRecord::new(AttendanceStatus::Present, 2.25);

        let mut known = AttendanceMap::new();
        known.insert(date_key(today), AttendanceRecord::new(AttendanceStatus::Absent, 0.0));
        let map = build_attendance_map(ymd(2026, 1, 1), today, &known, today, Some(live));
        assert_eq!(map[&date_key(today)], live);

        let map = build_attendance_map(ymd(2026, 1, 1), today, &AttendanceMap::new(), today, Some(live));
        assert_eq!(map[&date_key(today)], live);
        assert_eq!(map["2026-01-02"].status, AttendanceStatus::Absent);
    }

    #[test]
    fn live_today_requires_login() {
        let mut status = CurrentStatus {
            logged_in: false,
            status: Some(AttendanceStatus::Present),
            total_hours: Some(3.0),
            ..CurrentStatus::default()
        };
        assert_eq!(live_today(&status), None);

        status.logged_in = true;
        assert_eq!(
            live_today(&status),
            Some(AttendanceRecord::new(AttendanceStatus::Present, 3.0))
        );
    }

    #[test]
    fn rebuilding_from_same_inputs_is_identical() {
        let mut known = AttendanceMap::new();
        known.insert(
            "2026-02-10".to_string(),
            AttendanceRecord::new(AttendanceStatus::HalfDay, 4.0),
        );
        let today = ymd(2026, 3, 1);
        let (start, end) = rolling_window(today);
        let first = build_attendance_map(start, end, &known, today, None);
        let second = build_attendance_map(start, end, &known, today, None);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn null_hours_become_zero() {
        let mut days = BTreeMap::new();
        days.insert(
            "2026-01-05".to_string(),
            KnownDay {
                status: AttendanceStatus::HalfDay,
                hours_worked: None,
            },
        );
        let known = known_records(days);
        assert_eq!(known["2026-01-05"].hours_worked, 0.0);
    }
}
