use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/calendar/year", get(handlers::get_year))
        .route("/api/calendar/strip", get(handlers::get_strip))
        .route("/api/calendar/monthly", get(handlers::get_monthly))
        .route("/api/refresh", post(handlers::refresh))
        .route("/api/attendance/log", post(handlers::log_attendance))
        .route("/api/models/train", post(handlers::train_models))
        .route("/api/advanced-predict/productivity", post(handlers::advanced_predict))
        .with_state(state)
}
