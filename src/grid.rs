use crate::calendar::{date_key, week_start};
use crate::models::{
    AttendanceMap, AttendanceRecord, AttendanceStatus, CellTier, DayCell, MonthBlock, StripWeek,
};
use chrono::{Datelike, Duration, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// First match wins: present by hours (>= 8, >= 6, else low), then half-day,
/// weekend and absent.
pub fn classify(status: AttendanceStatus, hours_worked: f64) -> CellTier {
    match status {
        AttendanceStatus::Present if hours_worked >= 8.0 => CellTier::PresentFull,
        AttendanceStatus::Present if hours_worked >= 6.0 => CellTier::PresentPartial,
        AttendanceStatus::Present => CellTier::PresentLow,
        AttendanceStatus::HalfDay => CellTier::HalfDay,
        AttendanceStatus::Weekend => CellTier::Weekend,
        AttendanceStatus::Absent => CellTier::Absent,
    }
}

fn day_cell(map: &AttendanceMap, date: NaiveDate) -> DayCell {
    let key = date_key(date);
    let record = map
        .get(&key)
        .copied()
        .unwrap_or(AttendanceRecord::new(AttendanceStatus::Absent, 0.0));
    DayCell {
        day: date.day(),
        status: record.status,
        hours_worked: record.hours_worked,
        tier: classify(record.status, record.hours_worked),
        date: key,
    }
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// Sunday-first weeks, padded with `None` before the 1st and after the last day.
pub fn month_block(map: &AttendanceMap, year: i32, month: u32, today: NaiveDate) -> Option<MonthBlock> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let days = days_in_month(year, month)?;

    let mut weeks = Vec::with_capacity(6);
    let mut week: [Option<DayCell>; 7] = Default::default();
    let mut column = first.weekday().num_days_from_sunday() as usize;

    for offset in 0..days {
        let date = first + Duration::days(offset as i64);
        week[column] = Some(day_cell(map, date));
        column += 1;
        if column == 7 {
            weeks.push(std::mem::take(&mut week));
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }

    Some(MonthBlock {
        year,
        month,
        name: MONTH_NAMES[month as usize - 1].to_string(),
        selected: today.year() == year && today.month() == month,
        weeks,
    })
}

pub fn year_blocks(map: &AttendanceMap, year: i32, today: NaiveDate) -> Vec<MonthBlock> {
    (1..=12)
        .filter_map(|month| month_block(map, year, month, today))
        .collect()
}

/// Sunday-start week columns across `[start, end]`; the last one may be partial.
pub fn weekly_strip(map: &AttendanceMap, start: NaiveDate, end: NaiveDate) -> Vec<StripWeek> {
    let mut strip = Vec::new();
    let mut week = week_start(start);
    while week <= end {
        let days = (0..7)
            .map(|offset| week + Duration::days(offset))
            .filter(|date| *date >= start && *date <= end)
            .map(|date| day_cell(map, date))
            .collect();
        strip.push(StripWeek {
            start_date: date_key(week),
            days,
        });
        week += Duration::weeks(1);
    }
    strip
}
