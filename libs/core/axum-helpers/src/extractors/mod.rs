//! Custom extractors for Axum handlers.
//!
//! Both reject with [`crate::AppError`], so malformed input produces the
//! same error body as every other failure.

pub mod object_id_path;
pub mod validated_json;

pub use object_id_path::ObjectIdPath;
pub use validated_json::ValidatedJson;
