use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kissan_core::KissanError;
use kissan_tools::ToolError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), details: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn timeout(seconds: u64) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, format!("Imagery request timed out after {}s", seconds))
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, details: self.details };
        (self.status, Json(body)).into_response()
    }
}

impl From<KissanError> for ApiError {
    fn from(err: KissanError) -> Self {
        let status = match &err {
            KissanError::UnsupportedGeometryKind { .. }
            | KissanError::InvalidGeometry { .. }
            | KissanError::InvalidWkt { .. }
            | KissanError::UnsupportedIndexKind { .. }
            | KissanError::InvalidDate { .. }
            | KissanError::InvalidDateRange { .. }
            | KissanError::InvalidInput { .. }
            | KissanError::SelectionOutOfRange { .. } => StatusCode::BAD_REQUEST,
            KissanError::EmptyCollection { .. }
            | KissanError::RecordNotFound { .. }
            | KissanError::UpstreamLookup { .. } => StatusCode::NOT_FOUND,
            KissanError::DuplicateRecord { .. } => StatusCode::CONFLICT,
            KissanError::RemoteService { .. } => StatusCode::BAD_GATEWAY,
            _ => {
                tracing::error!(error = %err, "Internal error");
                return Self::internal("Internal error").with_details(err.to_string());
            }
        };
        Self::new(status, err.to_string())
    }
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::NotFound(name) => Self::not_found(format!("Tool not found: {}", name)),
            ToolError::InvalidArguments(reason) => {
                Self::bad_request("Invalid arguments").with_details(reason)
            }
            ToolError::ExecutionFailed(reason) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, reason)
            }
            ToolError::Domain(err) => err.into(),
        }
    }
}
