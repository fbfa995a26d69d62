use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    HalfDay,
    Absent,
    Weekend,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::HalfDay => "half-day",
            Self::Absent => "absent",
            Self::Weekend => "weekend",
        }
    }
}

/// One calendar day's attendance fact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub status: AttendanceStatus,
    pub hours_worked: f64,
}

impl AttendanceRecord {
    pub fn new(status: AttendanceStatus, hours_worked: f64) -> Self {
        Self {
            status,
            hours_worked,
        }
    }
}

/// Keyed by local `YYYY-MM-DD`, which sorts in calendar order.
pub type AttendanceMap = BTreeMap<String, AttendanceRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellTier {
    PresentFull,
    PresentPartial,
    PresentLow,
    HalfDay,
    Weekend,
    Absent,
}

impl CellTier {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::PresentFull => "present-full",
            Self::PresentPartial => "present-partial",
            Self::PresentLow => "present-low",
            Self::HalfDay => "half-day",
            Self::Weekend => "weekend",
            Self::Absent => "absent",
        }
    }
}

// Backend payloads.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentStatus {
    #[serde(default)]
    pub logged_in: bool,
    pub status: Option<AttendanceStatus>,
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub present_days_month: Option<u32>,
    #[serde(default)]
    pub attendance_rate_month: Option<f64>,
    #[serde(default)]
    pub total_hours_month: Option<f64>,
    #[serde(default)]
    pub current_streak_month: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KnownDay {
    pub status: AttendanceStatus,
    #[serde(default)]
    pub hours_worked: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct AllDaysResponse {
    #[serde(default)]
    pub success: bool,
    /// Decoded per entry so one malformed day does not void the rest.
    #[serde(default)]
    pub records: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyRecord {
    pub date: String,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub hours_worked: Option<f64>,
    #[serde(default)]
    pub is_weekend: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub records: Vec<MonthlyRecord>,
}

#[derive(Debug, Deserialize)]
pub struct PredictionsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub predictions: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct InsightsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub insights: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogRequest {
    pub action: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub productivity_scores: Vec<f64>,
    #[serde(default)]
    pub current_score: Option<f64>,
}

// Service responses.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u32,
    pub present_count: u32,
    pub working_day_count: u32,
    pub attendance_rate: u32,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub present_days: u32,
    pub working_days: u32,
    pub attendance_rate: u32,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakStats {
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyAveragePoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub days_counted: u8,
    pub present_days: u8,
    pub avg_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrelationBand {
    StrongPositive,
    ModeratePositive,
    Weak,
    ModerateNegative,
    StrongNegative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationInsight {
    pub samples: usize,
    pub coefficient: f64,
    pub band: CorrelationBand,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCell {
    pub date: String,
    pub day: u32,
    pub status: AttendanceStatus,
    pub hours_worked: f64,
    pub tier: CellTier,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthBlock {
    pub year: i32,
    pub month: u32,
    pub name: String,
    pub selected: bool,
    pub weeks: Vec<[Option<DayCell>; 7]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StripWeek {
    pub start_date: String,
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generation: u64,
    pub today: String,
    pub window_start: String,
    pub window_end: String,
    pub attendance: AttendanceMap,
    pub today_status: Option<CurrentStatus>,
    pub summary: WindowSummary,
    pub streaks: StreakStats,
    pub weekly_averages: Vec<WeeklyAveragePoint>,
    pub correlation: CorrelationInsight,
    pub current_score: Option<f64>,
    pub predictions: Value,
    pub insights: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub generation: u64,
    pub applied: bool,
}
