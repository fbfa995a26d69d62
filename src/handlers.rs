use crate::calendar::{local_today, parse_date_key};
use crate::errors::AppError;
use crate::grid::{weekly_strip, year_blocks};
use crate::models::{
    DashboardSnapshot, LogRequest, LogResponse, MonthBlock, MonthlyStats, RefreshResponse,
    StripWeek,
};
use crate::refresh::refresh_dashboard;
use crate::state::AppState;
use crate::stats::monthly_stats;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

/// The latest published snapshot. Without one, refreshes and serves what that
/// refresh built, even if a newer request overtook it before publishing.
async fn snapshot(state: &AppState) -> DashboardSnapshot {
    if let Some(snapshot) = state.current().await {
        return snapshot;
    }
    let (_, built) = refresh_dashboard(state).await;
    state.current().await.unwrap_or(built)
}

fn snapshot_today(snapshot: &DashboardSnapshot) -> NaiveDate {
    parse_date_key(&snapshot.today).unwrap_or_else(local_today)
}

/// Month blocks for `year` (default: the snapshot's year), selected against the snapshot's today.
fn year_view(snapshot: &DashboardSnapshot, year: Option<i32>) -> Vec<MonthBlock> {
    let today = snapshot_today(snapshot);
    year_blocks(&snapshot.attendance, year.unwrap_or(today.year()), today)
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = snapshot(&state).await;
    let months = year_view(&snapshot, None);
    Html(render_index(&snapshot, &months))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(snapshot(&state).await)
}

pub async fn get_year(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Json<Vec<MonthBlock>> {
    let snapshot = snapshot(&state).await;
    Json(year_view(&snapshot, query.year))
}

pub async fn get_strip(State(state): State<AppState>) -> Result<Json<Vec<StripWeek>>, AppError> {
    let snapshot = snapshot(&state).await;
    let (Some(start), Some(end)) = (
        parse_date_key(&snapshot.window_start),
        parse_date_key(&snapshot.window_end),
    ) else {
        return Err(AppError::bad_gateway("dashboard window is malformed"));
    };
    Ok(Json(weekly_strip(&snapshot.attendance, start, end)))
}

pub async fn get_monthly(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlyStats>, AppError> {
    if NaiveDate::from_ymd_opt(query.year, query.month, 1).is_none() {
        return Err(AppError::bad_request("month must be between 1 and 12"));
    }

    let records = state
        .backend
        .monthly(query.year, query.month)
        .await
        .inspect_err(|err| error!("monthly attendance fetch failed: {err}"))
        .map_err(|_| AppError::bad_gateway("Could not load monthly attendance"))?;

    Ok(Json(monthly_stats(query.year, query.month, &records)))
}

pub async fn refresh(State(state): State<AppState>) -> Json<RefreshResponse> {
    let (response, _) = refresh_dashboard(&state).await;
    Json(response)
}

pub async fn log_attendance(
    State(state): State<AppState>,
    Json(payload): Json<LogRequest>,
) -> Result<Json<LogResponse>, AppError> {
    let action = payload.action.trim();
    if action != "login" && action != "logout" {
        return Err(AppError::bad_request("action must be 'login' or 'logout'"));
    }

    let response = state.backend.log_attendance(action).await?;
    info!(action, "attendance logged");
    refresh_dashboard(&state).await;
    Ok(Json(response))
}

pub async fn train_models(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    Ok(Json(state.backend.train_models().await?))
}

pub async fn advanced_predict(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.backend.advanced_predict(&payload).await?))
}
