use axum::http::StatusCode;
use thiserror::Error;

/// Failures of the sales pipeline and its startup path.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The CSV payload could not be fetched or read.
    #[error("sales source {location} is unavailable: {reason}")]
    SourceUnavailable { location: String, reason: String },

    /// The payload was fetched but is not a usable sales table.
    #[error("sales source is malformed: {0}")]
    MalformedSource(String),

    /// A year or month selector outside the values present in the dataset.
    #[error("invalid {kind} selector '{value}'")]
    InvalidSelector { kind: &'static str, value: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        Self::MalformedSource(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::InvalidSelector { .. } => Self::bad_request(err.to_string()),
            other => Self::internal(other),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
