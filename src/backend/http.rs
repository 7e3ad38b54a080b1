use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::client::{BackendError, MonitoringClient};
use super::model::{CreateTimeSeriesRequest, TimeSeries};

/// Structured error body the backend returns on rejection:
/// `{"error": {"code": ..., "message": ..., "status": ...}}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// `MonitoringClient` over the Monitoring v3 REST surface.
pub struct HttpMonitoringClient {
    client: reqwest::Client,
    base_url: String,
    resource_name: String,
    bearer_token: Option<String>,
}

impl HttpMonitoringClient {
    /// `base_url` is the API root (`https://monitoring.googleapis.com` in
    /// production, a mock server in tests). Credential acquisition stays with
    /// the caller; pass an already-minted bearer token if the backend
    /// requires one.
    pub fn new(
        base_url: impl Into<String>,
        project_id: &str,
        bearer_token: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            resource_name: format!("projects/{}", project_id),
            bearer_token,
        }
    }
}

#[async_trait]
impl MonitoringClient for HttpMonitoringClient {
    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    async fn create_time_series(&self, series: &[TimeSeries]) -> Result<(), BackendError> {
        let url = format!("{}/v3/{}/timeSeries", self.base_url, self.resource_name);
        let request = CreateTimeSeriesRequest {
            time_series: series.to_vec(),
        };

        debug!("Sending {} time series to {}", series.len(), url);
        let mut builder = self.client.post(&url).json(&request);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // Prefer the structured error message; fall back to the raw body so
        // operators still see what the backend said.
        let body = response.text().await?;
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.error.message,
            Err(_) => body,
        };
        Err(BackendError::Api {
            code: status.as_u16(),
            message,
        })
    }
}
