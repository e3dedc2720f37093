use std::time::Duration;

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::variant::UnrecognizedKind;

#[derive(Debug, Error)]
pub enum PostError {
    /// Named field is not a 24-character hex ObjectId
    #[error("invalid {0} format")]
    InvalidId(&'static str),

    #[error("Post {0} not found")]
    PostNotFound(ObjectId),

    #[error("Event {0} not found")]
    EventNotFound(ObjectId),

    #[error(transparent)]
    UnrecognizedKind(#[from] UnrecognizedKind),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("request deadline of {0:?} exceeded")]
    Timeout(Duration),
}

pub type PostResult<T> = Result<T, PostError>;

/// Not-found maps to 500 with the bare "Post not found" / "Event not found"
/// message; clients of this API match on that.
impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::InvalidId(field) => AppError::InvalidObjectId(format!("invalid {field} format")),
            PostError::PostNotFound(_) => AppError::InternalServerError("Post not found".to_string()),
            PostError::EventNotFound(_) => {
                AppError::InternalServerError("Event not found".to_string())
            }
            PostError::UnrecognizedKind(e) => AppError::InternalServerError(e.to_string()),
            PostError::Validation(msg) => AppError::BadRequest(msg),
            PostError::Database(e) => AppError::Database(e),
            PostError::Timeout(deadline) => AppError::Timeout(format!(
                "request deadline of {}s exceeded",
                deadline.as_secs()
            )),
        }
    }
}

impl IntoResponse for PostError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_is_internal_error() {
        let response = PostError::PostNotFound(ObjectId::new()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = PostError::EventNotFound(ObjectId::new()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_id_is_bad_request() {
        let response = PostError::InvalidId("eventID").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_timeout_is_internal_error() {
        let response = PostError::Timeout(Duration::from_secs(100)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unrecognized_kind_message() {
        let err = PostError::from(UnrecognizedKind {
            id: ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap(),
            kind: "poll".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "post 65a1b2c3d4e5f60718293a4b has unrecognized kind 'poll'"
        );
    }
}
