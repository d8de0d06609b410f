use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to initialize classifier: {0}")]
    InitializationError(String),

    #[error("Model is not loaded: {0}")]
    ModelUnavailable(String),

    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("Classifier returned unknown label {0}")]
    UnknownLabel(usize),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Upload exceeds the maximum size of {max} bytes")]
    UploadTooLarge { max: usize },

    #[error("No file selected")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OcrError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OcrError::InitializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OcrError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            OcrError::ImageDecode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            OcrError::Classification(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OcrError::UnknownLabel(_) => StatusCode::INTERNAL_SERVER_ERROR,
            OcrError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
            OcrError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            OcrError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            OcrError::MissingFile => StatusCode::BAD_REQUEST,
            OcrError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            OcrError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            OcrError::InitializationError(_) => "INIT_ERROR",
            OcrError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            OcrError::ImageDecode(_) => "IMAGE_DECODE_ERROR",
            OcrError::Classification(_) => "CLASSIFICATION_ERROR",
            OcrError::UnknownLabel(_) => "UNKNOWN_LABEL",
            OcrError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            OcrError::ImageTooLarge { .. } | OcrError::UploadTooLarge { .. } => "IMAGE_TOO_LARGE",
            OcrError::MissingFile => "MISSING_FILE",
            OcrError::InvalidRequest(_) => "INVALID_REQUEST",
            OcrError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Failure body shared by every endpoint
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl IntoResponse for OcrError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = Json(ErrorResponse {
            success: false,
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}
