use async_trait::async_trait;
use thiserror::Error;

use super::model::TimeSeries;

/// Errors surfaced by a monitoring backend client.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The exchange itself failed; nothing is known about how the backend
    /// judged the payload.
    #[error("transport error talking to the monitoring backend: {0}")]
    Transport(String),
    /// The backend answered and rejected the request.
    #[error("monitoring backend rejected the request ({code}): {message}")]
    Api { code: u16, message: String },
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError::Transport(e.to_string())
    }
}

impl BackendError {
    /// True when the whole exchange failed, as opposed to the backend
    /// rejecting the payload it received.
    pub fn is_transport(&self) -> bool {
        matches!(self, BackendError::Transport(_))
    }
}

/// The submission seam to the monitoring backend. One call maps to one
/// `timeSeries.create` against the configured project resource.
#[async_trait]
pub trait MonitoringClient: Send + Sync {
    /// The `projects/<project-id>` resource series are written against.
    fn resource_name(&self) -> &str;

    async fn create_time_series(&self, series: &[TimeSeries]) -> Result<(), BackendError>;
}
