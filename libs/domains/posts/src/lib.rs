//! Posts Domain
//!
//! Announcements, votes and forms attached to events, stored in MongoDB.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Deadline, insert + event link, dispatch
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Posts and events (traits + MongoDB implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Stored documents, request DTOs, response variants
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_posts::{MongoEventRepository, MongoPostRepository, PostService, handlers};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("cpeevent");
//!
//! let service = PostService::new(MongoPostRepository::new(&db), MongoEventRepository::new(&db));
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod variant;

pub use error::{PostError, PostResult};
pub use handlers::ApiDoc;
pub use models::{CreatePostRequest, Event, FormQuestion, Post, PostInput, VoteQuestion};
pub use self::mongodb::{MongoEventRepository, MongoPostRepository};
pub use repository::{EventRepository, PostRepository};
pub use service::PostService;
pub use variant::{FormPost, PostKind, PostSummary, PostVariant, UnrecognizedKind, VotePost};
