use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::error::PostResult;
use crate::models::{Event, Post};

/// Persistence for post documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: &Post) -> PostResult<()>;

    async fn find_by_id(&self, id: ObjectId) -> PostResult<Option<Post>>;

    /// All posts whose id is in `ids`, in store order. Missing ids are skipped.
    async fn find_many(&self, ids: &[ObjectId]) -> PostResult<Vec<Post>>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: ObjectId) -> PostResult<bool>;
}

/// Read access to events plus the single write this domain performs on them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_event(&self, id: ObjectId) -> PostResult<Option<Event>>;

    /// Adds `post_id` to the event's `postList` unless already present.
    ///
    /// Returns `false` when no event has `event_id`.
    async fn append_post(&self, event_id: ObjectId, post_id: ObjectId) -> PostResult<bool>;
}
