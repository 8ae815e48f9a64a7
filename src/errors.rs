use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::models::ChainId;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid chain ID. Supported chains: {}", ChainId::supported_list())]
    InvalidChain(String),
    #[error("Failed to fetch data for {0}")]
    UpstreamFetchFailed(ChainId),
    #[error("Failed to process data for {0}")]
    DataProcessingFailed(ChainId),
    #[error("No data available to export")]
    NoDataAvailable,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidChain(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamFetchFailed(_)
            | AppError::DataProcessingFailed(_)
            | AppError::NoDataAvailable
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", value))
    }
}
