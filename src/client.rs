use crate::errors::AppError;
use crate::models::{
    AllDaysResponse, CurrentStatus, DashboardData, InsightsResponse, KnownDay, LogRequest,
    LogResponse, MonthlyRecord, MonthlyResponse, PredictionsResponse,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Skips entries that do not decode as a day record.
pub fn decode_known_days(records: BTreeMap<String, Value>) -> BTreeMap<String, KnownDay> {
    records
        .into_iter()
        .filter_map(|(date, raw)| match serde_json::from_value::<KnownDay>(raw) {
            Ok(day) => Some((date, day)),
            Err(err) => {
                warn!("skipping all-days record for {date}: {err}");
                None
            }
        })
        .collect()
}

/// Typed access to the HR backend. Payloads gated by a `success` flag are
/// only trusted when it is `true`.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn current_status(&self) -> Result<CurrentStatus, AppError> {
        self.get_json("/api/attendance/current-status").await
    }

    pub async fn all_days(&self) -> Result<BTreeMap<String, KnownDay>, AppError> {
        let body: AllDaysResponse = self.get_json("/api/attendance/all-days").await?;
        if !body.success {
            return Err(AppError::bad_gateway("all-days reported failure"));
        }
        Ok(decode_known_days(body.records))
    }

    pub async fn monthly(&self, year: i32, month: u32) -> Result<Vec<MonthlyRecord>, AppError> {
        let body: MonthlyResponse = self
            .get_json(&format!("/api/attendance/monthly?year={year}&month={month}"))
            .await?;
        if !body.success {
            return Err(AppError::bad_gateway("monthly attendance reported failure"));
        }
        Ok(body.records)
    }

    pub async fn predictions(&self) -> Result<Value, AppError> {
        let body: PredictionsResponse = self.get_json("/api/attendance/predictions").await?;
        match body.predictions {
            Some(predictions) if body.success && !predictions.is_null() => Ok(predictions),
            _ => Err(AppError::bad_gateway("predictions unavailable")),
        }
    }

    pub async fn insights(&self) -> Result<Value, AppError> {
        let body: InsightsResponse = self.get_json("/api/attendance/insights").await?;
        match body.insights {
            Some(insights) if body.success && !insights.is_null() => Ok(insights),
            _ => Err(AppError::bad_gateway("insights unavailable")),
        }
    }

    pub async fn dashboard_data(&self, days: u32) -> Result<DashboardData, AppError> {
        self.get_json(&format!("/api/dashboard-data?days={days}")).await
    }

    pub async fn log_attendance(&self, action: &str) -> Result<LogResponse, AppError> {
        let response = self
            .client
            .post(self.url("/api/attendance/log"))
            .json(&LogRequest {
                action: action.to_string(),
            })
            .send()
            .await?;
        // A rejected log still carries a JSON message worth showing.
        let body: LogResponse = response.json().await?;
        if !body.success {
            let message = if body.message.is_empty() {
                "attendance log rejected".to_string()
            } else {
                body.message
            };
            return Err(AppError::bad_gateway(message));
        }
        Ok(body)
    }

    pub async fn train_models(&self) -> Result<Value, AppError> {
        self.get_json("/train-attendance-models").await
    }

    pub async fn advanced_predict(&self, payload: &Value) -> Result<Value, AppError> {
        let response = self
            .client
            .post(self.url("/api/advanced-predict/productivity"))
            .json(payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}
