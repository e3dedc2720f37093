pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::error::{Error as MongoError, ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for every error so clients can rely on one shape:
/// - `success`: always `false`
/// - `error`: human-readable message
/// - `code`: machine-readable identifier (e.g., "INVALID_OBJECT_ID")
/// - `details`: optional structured details (e.g., validation field errors)
///
/// ```json
/// {
///   "success": false,
///   "error": "invalid eventID format",
///   "code": "INVALID_OBJECT_ID"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    /// Human-readable error message
    pub error: String,
    /// Machine-readable error identifier for programmatic handling
    pub code: ErrorCode,
    /// Optional structured error details (e.g., validation field errors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application error type that can be converted to HTTP responses.
///
/// Integrates the error types of our dependencies and renders them as
/// [`ErrorResponse`] bodies, logging each with its integer error code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] MongoError),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationErrors),

    /// An identifier that is not a 24-character hex ObjectId, with a
    /// message naming the offending field.
    #[error("Invalid ObjectId: {0}")]
    InvalidObjectId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Timeout: {0}")]
    Timeout(String),
}

impl AppError {
    /// Status, client message, details and code for this error.
    fn parts(self) -> (StatusCode, String, Option<serde_json::Value>, ErrorCode) {
        match self {
            AppError::Database(e) => map_mongo_error(&e),
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    status = %e.status(),
                    "JSON extraction error: {}",
                    e.body_text()
                );
                (
                    StatusCode::BAD_REQUEST,
                    e.body_text(),
                    None,
                    ErrorCode::JsonExtraction,
                )
            }
            AppError::ValidationError(e) => {
                tracing::info!(error_code = ErrorCode::ValidationError.code(), "Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationError.default_message().to_string(),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                    ErrorCode::ValidationError,
                )
            }
            AppError::InvalidObjectId(msg) => {
                tracing::info!(error_code = ErrorCode::InvalidObjectId.code(), "Invalid ObjectId: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::InvalidObjectId)
            }
            AppError::BadRequest(msg) => {
                tracing::info!(error_code = ErrorCode::BadRequest.code(), "Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::BadRequest)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = ErrorCode::InternalError.code(), "Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    msg,
                    None,
                    ErrorCode::InternalError,
                )
            }
            AppError::Timeout(msg) => {
                tracing::warn!(error_code = ErrorCode::Timeout.code(), "Timeout: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None, ErrorCode::Timeout)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = self.parts();

        let body = match details {
            Some(details) => ErrorResponse::new(code, message).with_details(details),
            None => ErrorResponse::new(code, message),
        };

        (status, Json(body)).into_response()
    }
}

/// Maps a MongoDB driver error to response components by its [`ErrorKind`].
///
/// Driver messages are logged, never returned to clients.
fn map_mongo_error(error: &MongoError) -> (StatusCode, String, Option<serde_json::Value>, ErrorCode) {
    let (status, code) = match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::DatabaseUnavailable)
        }
        ErrorKind::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseIo),
        ErrorKind::Authentication { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseAuth)
        }
        ErrorKind::BsonDeserialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseDecode)
        }
        ErrorKind::BsonSerialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseEncode)
        }
        ErrorKind::Write(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseWrite),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DatabaseError),
    };

    tracing::error!(error_code = code.code(), error = %error, "MongoDB error");

    (status, code.default_message().to_string(), None, code)
}

/// Build an error response outside of [`AppError`], e.g. in fallbacks.
pub fn error_response(status: StatusCode, message: impl Into<String>, code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(code, message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_and_code(err: AppError) -> (StatusCode, ErrorCode) {
        let (status, _, _, code) = err.parts();
        (status, code)
    }

    #[test]
    fn test_bad_request_keeps_message() {
        let (status, message, _, code) = AppError::BadRequest("eventID is required".into()).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "eventID is required");
        assert_eq!(code, ErrorCode::BadRequest);
    }

    #[test]
    fn test_unclassified_mongo_error_is_generic_database_error() {
        let err = MongoError::custom("placeholder");
        let (status, code) = status_and_code(AppError::Database(err));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, ErrorCode::DatabaseError);
    }

    #[test]
    fn test_invalid_object_id_keeps_field_message() {
        let (status, message, _, code) =
            AppError::InvalidObjectId("invalid postID format".into()).parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "invalid postID format");
        assert_eq!(code, ErrorCode::InvalidObjectId);
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            status_and_code(AppError::InternalServerError("Post not found".into())),
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
        );
    }

    #[test]
    fn test_timeout_status() {
        assert_eq!(
            status_and_code(AppError::Timeout("deadline".into())),
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Timeout)
        );
    }

    #[test]
    fn test_error_response_serialization() {
        let body = ErrorResponse::new(ErrorCode::InvalidObjectId, "invalid eventID format");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": "invalid eventID format",
                "code": "INVALID_OBJECT_ID"
            })
        );
    }
}
