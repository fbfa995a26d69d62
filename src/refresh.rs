use crate::calendar::{build_attendance_map, date_key, known_records, live_today, local_today, rolling_window};
use crate::models::{CurrentStatus, DashboardData, DashboardSnapshot, KnownDay, RefreshResponse};
use crate::state::AppState;
use crate::stats::{correlation_insight, streaks, weekly_averages, window_summary};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::{collections::BTreeMap, time::Duration};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

/// Everything one refresh pass pulled from the backend, already degraded to
/// defaults where a fetch failed.
#[derive(Debug, Default)]
pub struct Fetched {
    pub known: BTreeMap<String, KnownDay>,
    pub status: Option<CurrentStatus>,
    pub dashboard: DashboardData,
    pub predictions: Option<Value>,
    pub insights: Option<Value>,
}

/// Shown when the backend has no predictions to offer.
pub fn fallback_predictions() -> Value {
    json!({
        "tomorrow_prediction": {
            "probability": 0.0,
            "expected_hours": 0.0,
            "confidence": "low",
            "model_used": "fallback"
        },
        "weekly_trend": [],
        "streak_analysis": {
            "current_streak": 0,
            "probability_continue": 0,
            "expected_end_in": 0
        },
        "absence_likelihood": {
            "risk_level": "unknown",
            "probability": 0.0,
            "factors": []
        }
    })
}

pub async fn fetch_all(state: &AppState) -> Fetched {
    let backend = &state.backend;
    let (known, status, dashboard, predictions, insights) = tokio::join!(
        backend.all_days(),
        backend.current_status(),
        backend.dashboard_data(state.config.dashboard_days),
        backend.predictions(),
        backend.insights(),
    );

    Fetched {
        known: known.unwrap_or_else(|err| {
            warn!("all-days fetch failed, assuming no history: {err}");
            BTreeMap::new()
        }),
        status: status
            .inspect_err(|err| warn!("current-status fetch failed: {err}"))
            .ok(),
        dashboard: dashboard.unwrap_or_else(|err| {
            warn!("dashboard-data fetch failed: {err}");
            DashboardData::default()
        }),
        predictions: predictions
            .inspect_err(|err| warn!("predictions fetch failed: {err}"))
            .ok(),
        insights: insights
            .inspect_err(|err| warn!("insights fetch failed: {err}"))
            .ok(),
    }
}

pub fn assemble_snapshot(generation: u64, today: NaiveDate, fetched: Fetched) -> DashboardSnapshot {
    let (start, end) = rolling_window(today);
    let known = known_records(fetched.known);
    let live = fetched.status.as_ref().and_then(live_today);
    let attendance = build_attendance_map(start, end, &known, today, live);

    let correlation = correlation_insight(
        &attendance,
        &fetched.dashboard.dates,
        &fetched.dashboard.productivity_scores,
    );

    DashboardSnapshot {
        generation,
        today: date_key(today),
        window_start: date_key(start),
        window_end: date_key(end),
        summary: window_summary(&attendance, today),
        streaks: streaks(&attendance, today),
        weekly_averages: weekly_averages(&attendance, today),
        correlation,
        current_score: fetched.dashboard.current_score,
        predictions: fetched.predictions.unwrap_or_else(fallback_predictions),
        insights: fetched.insights,
        today_status: fetched.status,
        attendance,
    }
}

/// Runs one full refresh. The snapshot is only published if no newer refresh
/// was issued meanwhile, but it is always handed back to the caller.
pub async fn refresh_dashboard(state: &AppState) -> (RefreshResponse, DashboardSnapshot) {
    let generation = state.next_generation();
    let fetched = fetch_all(state).await;
    let snapshot = assemble_snapshot(generation, local_today(), fetched);

    let applied = state.publish(snapshot.clone()).await;
    if applied {
        info!(generation, "dashboard refreshed");
    } else {
        debug!(generation, "discarding stale dashboard refresh");
    }
    let response = RefreshResponse {
        generation,
        applied,
    };
    (response, snapshot)
}

/// Periodic refresh; aborted on [`RefreshTask::shutdown`] or drop.
pub struct RefreshTask {
    handle: Option<JoinHandle<()>>,
}

impl RefreshTask {
    pub fn spawn(state: AppState, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                refresh_dashboard(&state).await;
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("periodic refresh stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}
