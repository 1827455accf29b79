use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::admission::{
    AdmissionScoreError, HistoryImportError, MetadataImportError,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Metadata(MetadataImportError),
    History(HistoryImportError),
    Score(AdmissionScoreError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Metadata(err) => write!(f, "facility data error: {}", err),
            AppError::History(err) => write!(f, "admission history error: {}", err),
            AppError::Score(err) => write!(f, "scoring error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Metadata(err) => Some(err),
            AppError::History(err) => Some(err),
            AppError::Score(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Score(AdmissionScoreError::InvalidRequest(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Score(AdmissionScoreError::DataUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Metadata(_)
            | AppError::History(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<MetadataImportError> for AppError {
    fn from(value: MetadataImportError) -> Self {
        Self::Metadata(value)
    }
}

impl From<HistoryImportError> for AppError {
    fn from(value: HistoryImportError) -> Self {
        Self::History(value)
    }
}

impl From<AdmissionScoreError> for AppError {
    fn from(value: AdmissionScoreError) -> Self {
        Self::Score(value)
    }
}
