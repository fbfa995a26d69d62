use crate::calendar::{date_key, is_weekend, parse_date_key, week_start};
use crate::models::{
    AttendanceMap, AttendanceStatus, CorrelationBand, CorrelationInsight, MonthlyRecord,
    MonthlyStats, StreakStats, WeeklyAveragePoint, WindowSummary,
};
use chrono::{Datelike, Duration, NaiveDate};

const WEEK_COUNT: usize = 8;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn rate(present: u32, working: u32) -> u32 {
    if working == 0 {
        0
    } else {
        (f64::from(present) / f64::from(working) * 100.0).round() as u32
    }
}

/// Weekend records count toward neither the rate nor the hours.
pub fn monthly_stats(year: i32, month: u32, records: &[MonthlyRecord]) -> MonthlyStats {
    let mut present_count = 0u32;
    let mut working_day_count = 0u32;
    let mut total_hours = 0.0;

    for record in records {
        let weekend = record.is_weekend.unwrap_or_else(|| {
            parse_date_key(&record.date).is_some_and(is_weekend)
        });
        if weekend {
            continue;
        }
        working_day_count += 1;
        if record.status == AttendanceStatus::Present {
            present_count += 1;
        }
        total_hours += record.hours_worked.unwrap_or(0.0);
    }

    MonthlyStats {
        year,
        month,
        present_count,
        working_day_count,
        attendance_rate: rate(present_count, working_day_count),
        total_hours: round2(total_hours),
    }
}

/// Same aggregation as [`monthly_stats`] over the map, up to and including `today`.
pub fn window_summary(map: &AttendanceMap, today: NaiveDate) -> WindowSummary {
    let today_key = date_key(today);
    let mut present_days = 0u32;
    let mut working_days = 0u32;
    let mut total_hours = 0.0;

    for (_, record) in map.range(..=today_key) {
        if record.status == AttendanceStatus::Weekend {
            continue;
        }
        working_days += 1;
        if record.status == AttendanceStatus::Present {
            present_days += 1;
        }
        total_hours += record.hours_worked;
    }

    WindowSummary {
        present_days,
        working_days,
        attendance_rate: rate(present_days, working_days),
        total_hours: round2(total_hours),
    }
}

/// Weekends neither extend nor break a run. Today only counts once present.
pub fn streaks(map: &AttendanceMap, today: NaiveDate) -> StreakStats {
    let today_key = date_key(today);

    let mut current_streak = 0u32;
    for (key, record) in map.range(..=today_key.clone()).rev() {
        match record.status {
            AttendanceStatus::Weekend => continue,
            AttendanceStatus::Present => current_streak += 1,
            _ if *key == today_key => continue,
            _ => break,
        }
    }

    let mut longest_streak = 0u32;
    let mut run = 0u32;
    for (_, record) in map.range(..=today_key) {
        match record.status {
            AttendanceStatus::Weekend => {}
            AttendanceStatus::Present => {
                run += 1;
                longest_streak = longest_streak.max(run);
            }
            _ => run = 0,
        }
    }

    StreakStats {
        current_streak,
        longest_streak: longest_streak.max(current_streak),
    }
}

pub fn weekly_averages(map: &AttendanceMap, today: NaiveDate) -> Vec<WeeklyAveragePoint> {
    let current_week_start = week_start(today);
    let mut points = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let mut hours = 0.0;
        let mut present_days = 0u8;
        for day_offset in 0..7 {
            let date = start + Duration::days(day_offset);
            if date > today {
                break;
            }
            if let Some(record) = map.get(&date_key(date)) {
                hours += record.hours_worked;
                if record.status == AttendanceStatus::Present {
                    present_days += 1;
                }
            }
        }

        let days_counted = if today < start {
            0
        } else if today > end {
            7
        } else {
            (today - start).num_days() as u8 + 1
        };
        let denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };

        points.push(WeeklyAveragePoint {
            week: week_label(start),
            start_date: date_key(start),
            end_date: date_key(end),
            days_counted,
            present_days,
            avg_hours: round2(hours / denom),
        });
    }

    points
}

/// ISO label of a Sunday-start week, taken from its Monday.
fn week_label(start: NaiveDate) -> String {
    let iso = (start + Duration::days(1)).iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Pearson's r. Zero for empty or unequal inputs and when either side has no variance.
pub fn correlation(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.is_empty() || xs.len() != ys.len() {
        return 0.0;
    }
    let n = xs.len() as f64;
    let (mut sx, mut sy, mut sxy, mut sx2, mut sy2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys) {
        sx += x;
        sy += y;
        sxy += x * y;
        sx2 += x * x;
        sy2 += y * y;
    }

    let numerator = n * sxy - sx * sy;
    let denominator = ((n * sx2 - sx * sx) * (n * sy2 - sy * sy)).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    numerator / denominator
}

/// Bands: `(0.5, ∞)`, `(0.2, 0.5]`, `[-0.2, 0.2]`, `[-0.5, -0.2)`, `(-∞, -0.5)`.
pub fn correlation_band(r: f64) -> CorrelationBand {
    if r > 0.5 {
        CorrelationBand::StrongPositive
    } else if r > 0.2 {
        CorrelationBand::ModeratePositive
    } else if r >= -0.2 {
        CorrelationBand::Weak
    } else if r >= -0.5 {
        CorrelationBand::ModerateNegative
    } else {
        CorrelationBand::StrongNegative
    }
}

fn band_message(band: CorrelationBand) -> &'static str {
    match band {
        CorrelationBand::StrongPositive => {
            "Strong positive correlation: longer days go with higher productivity."
        }
        CorrelationBand::ModeratePositive => {
            "Moderate positive correlation between hours worked and productivity."
        }
        CorrelationBand::Weak => "Weak or no correlation between hours worked and productivity.",
        CorrelationBand::ModerateNegative => {
            "Moderate negative correlation: longer days tend to lower productivity."
        }
        CorrelationBand::StrongNegative => {
            "Strong negative correlation: extra hours are hurting productivity."
        }
    }
}

/// Pairs each productivity score with that date's hours from the map.
pub fn correlation_insight(
    map: &AttendanceMap,
    dates: &[String],
    productivity_scores: &[f64],
) -> CorrelationInsight {
    let (hours, scores): (Vec<f64>, Vec<f64>) = dates
        .iter()
        .zip(productivity_scores)
        .filter_map(|(date, score)| map.get(date).map(|record| (record.hours_worked, *score)))
        .unzip();

    let coefficient = correlation(&hours, &scores);
    let band = correlation_band(coefficient);
    CorrelationInsight {
        samples: hours.len(),
        coefficient: round2(coefficient),
        band,
        message: band_message(band).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::build_attendance_map;
    use crate::models::AttendanceRecord;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly(date: &str, status: AttendanceStatus, hours: f64, weekend: Option<bool>) -> MonthlyRecord {
        MonthlyRecord {
            date: date.to_string(),
            status,
            hours_worked: Some(hours),
            is_weekend: weekend,
        }
    }

    #[test]
    fn monthly_stats_exclude_weekends() {
        let records = vec![
            monthly("2026-01-05", AttendanceStatus::Present, 8.0, Some(false)),
            monthly("2026-01-06", AttendanceStatus::Absent, 0.0, Some(false)),
            monthly("2026-01-10", AttendanceStatus::Present, 4.0, Some(true)),
        ];
        let stats = monthly_stats(2026, 1, &records);
        assert_eq!(stats.present_count, 1);
        assert_eq!(stats.working_day_count, 2);
        assert_eq!(stats.attendance_rate, 50);
        assert_eq!(stats.total_hours, 8.0);
    }

    #[test]
    fn monthly_stats_handle_empty_and_derived_weekends() {
        let empty = monthly_stats(2026, 1, &[]);
        assert_eq!(empty.attendance_rate, 0);
        assert_eq!(empty.total_hours, 0.0);

        // 2026-01-03 is a Saturday; is_weekend is derived when missing.
        let records = vec![
            monthly("2026-01-03", AttendanceStatus::Present, 3.0, None),
            monthly("2026-01-02", AttendanceStatus::Present, 7.333, None),
            monthly("2026-01-01", AttendanceStatus::HalfDay, 4.0, None),
        ];
        let stats = monthly_stats(2026, 1, &records);
        assert_eq!(stats.working_day_count, 2);
        assert_eq!(stats.present_count, 1);
        assert_eq!(stats.attendance_rate, 50);
        assert_eq!(stats.total_hours, 11.33);
    }

    #[test]
    fn correlation_reference_values() {
        assert_eq!(correlation(&[], &[]), 0.0);
        assert!((correlation(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-12);
        assert!((correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-12);
        assert_eq!(correlation(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(correlation(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn correlation_bands_are_half_open() {
        assert_eq!(correlation_band(0.51), CorrelationBand::StrongPositive);
        assert_eq!(correlation_band(0.5), CorrelationBand::ModeratePositive);
        assert_eq!(correlation_band(0.21), CorrelationBand::ModeratePositive);
        assert_eq!(correlation_band(0.2), CorrelationBand::Weak);
        assert_eq!(correlation_band(0.0), CorrelationBand::Weak);
        assert_eq!(correlation_band(-0.2), CorrelationBand::Weak);
        assert_eq!(correlation_band(-0.21), CorrelationBand::ModerateNegative);
        assert_eq!(correlation_band(-0.5), CorrelationBand::ModerateNegative);
        assert_eq!(correlation_band(-0.51), CorrelationBand::StrongNegative);
    }

    fn sample_map(today: NaiveDate) -> AttendanceMap {
        // Week of Mon 2026-01-05 .. Fri 2026-01-09; today is Mon 2026-01-12.
        let mut known = AttendanceMap::new();
        let present = AttendanceRecord::new(AttendanceStatus::Present, 8.0);
        known.insert("2026-01-02".to_string(), present);
        known.insert("2026-01-06".to_string(), present);
        known.insert("2026-01-07".to_string(), present);
        known.insert("2026-01-08".to_string(), AttendanceRecord::new(AttendanceStatus::Present, 6.0));
        known.insert("2026-01-09".to_string(), present);
        build_attendance_map(ymd(2026, 1, 1), today, &known, today, None)
    }

    #[test]
    fn streaks_skip_weekends_and_unrecorded_today() {
        let today = ymd(2026, 1, 12);
        let map = sample_map(today);
        let streaks = streaks(&map, today);
        assert_eq!(streaks.current_streak, 4);
        assert_eq!(streaks.longest_streak, 4);
    }

    #[test]
    fn streak_breaks_on_absent_day() {
        let today = ymd(2026, 1, 13);
        let map = sample_map(today);
        // Monday the 12th is absent and no longer today.
        assert_eq!(streaks(&map, today).current_streak, 0);
        assert_eq!(streaks(&map, today).longest_streak, 4);
    }

    #[test]
    fn summary_counts_working_days_only() {
        let today = ymd(2026, 1, 12);
        let summary = window_summary(&sample_map(today), today);
        // Jan 1..12 has 4 weekend days.
        assert_eq!(summary.working_days, 8);
        assert_eq!(summary.present_days, 5);
        assert_eq!(summary.attendance_rate, 63);
        assert_eq!(summary.total_hours, 38.0);
    }

    #[test]
    fn weekly_averages_follow_elapsed_days() {
        let today = ymd(2026, 1, 12);
        let points = weekly_averages(&sample_map(today), today);
        assert_eq!(points.len(), 8);

        let current = points.last().unwrap();
        assert_eq!(current.start_date, "2026-01-11");
        assert_eq!(current.week, "2026-W03");
        assert_eq!(current.days_counted, 2);
        assert_eq!(current.avg_hours, 0.0);

        let previous = &points[6];
        assert_eq!(previous.start_date, "2026-01-04");
        assert_eq!(previous.week, "2026-W02");
        assert_eq!(previous.days_counted, 7);
        assert_eq!(previous.present_days, 4);
        assert_eq!(previous.avg_hours, 4.29);
    }

    #[test]
    fn week_label_uses_the_iso_week_of_the_monday() {
        assert_eq!(week_label(ymd(2026, 1, 11)), "2026-W03");
        assert_eq!(week_label(ymd(2025, 12, 28)), "2026-W01");
    }

    #[test]
    fn insight_pairs_dates_with_map_hours() {
        let today = ymd(2026, 1, 12);
        let map = sample_map(today);
        let dates = vec![
            "2026-01-06".to_string(),
            "2026-01-08".to_string(),
            "2026-01-12".to_string(),
            "2025-06-01".to_string(),
        ];
        let insight = correlation_insight(&map, &dates, &[80.0, 60.0, 0.0, 99.0]);
        assert_eq!(insight.samples, 3);
        assert!(insight.coefficient > 0.5);
        assert_eq!(insight.band, CorrelationBand::StrongPositive);
    }
}
