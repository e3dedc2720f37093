//! ObjectId path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, RawPathParams},
    http::request::Parts,
};
use mongodb::bson::oid::ObjectId;

/// Extractor for the last path parameter of a route, parsed as a hex ObjectId.
///
/// Rejects with `400 INVALID_OBJECT_ID` and a message naming the parameter,
/// e.g. `invalid postID format`.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::ObjectIdPath;
///
/// async fn get_post(ObjectIdPath(id): ObjectIdPath) -> String {
///     id.to_hex()
/// }
///
/// let app = Router::new().route("/posts/{postID}", get(get_post));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectIdPath(pub ObjectId);

impl<S> FromRequestParts<S> for ObjectIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = RawPathParams::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let (name, raw) = params
            .iter()
            .last()
            .ok_or_else(|| AppError::BadRequest("missing path identifier".to_string()))?;

        if raw.trim().is_empty() {
            return Err(AppError::BadRequest(format!("{name} is required")));
        }

        ObjectId::parse_str(raw.trim())
            .map(ObjectIdPath)
            .map_err(|_| AppError::InvalidObjectId(format!("invalid {name} format")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn echo(ObjectIdPath(id): ObjectIdPath) -> String {
        id.to_hex()
    }

    fn app() -> Router {
        Router::new().route("/posts/{postID}", get(echo))
    }

    async fn call(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_valid_object_id() {
        let (status, body) = call("/posts/65a1b2c3d4e5f60718293a4b").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"65a1b2c3d4e5f60718293a4b");
    }

    #[tokio::test]
    async fn test_invalid_object_id_names_parameter() {
        let (status, body) = call("/posts/not-an-id").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "invalid postID format");
        assert_eq!(json["code"], "INVALID_OBJECT_ID");
    }
}
