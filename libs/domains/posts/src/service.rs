//! Post Service - request-level logic over the repositories

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tracing::instrument;
use validator::Validate;

use crate::error::{PostError, PostResult};
use crate::models::{CreatePostRequest, PostInput};
use crate::repository::{EventRepository, PostRepository};
use crate::variant::PostVariant;

/// Deadline applied when none is configured.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(100);

/// Each public operation runs under `deadline`; on expiry the in-flight
/// database future is dropped and [`PostError::Timeout`] is returned.
pub struct PostService<R: PostRepository, E: EventRepository> {
    posts: Arc<R>,
    events: Arc<E>,
    deadline: Duration,
}

impl<R: PostRepository, E: EventRepository> PostService<R, E> {
    pub fn new(posts: R, events: E) -> Self {
        Self {
            posts: Arc::new(posts),
            events: Arc::new(events),
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    async fn within<T>(&self, operation: impl Future<Output = PostResult<T>>) -> PostResult<T> {
        tokio::time::timeout(self.deadline, operation)
            .await
            .map_err(|_| PostError::Timeout(self.deadline))?
    }

    /// Inserts the post, then appends its id to the event's `postList`.
    ///
    /// If the append fails or no event matches, the new post is deleted
    /// again before the error is returned. Returns the request with the
    /// post's `_id` and `postID` filled in.
    #[instrument(skip(self, request), fields(event_id = %request.event_id))]
    pub async fn create_post(&self, request: CreatePostRequest) -> PostResult<CreatePostRequest> {
        request
            .validate()
            .map_err(|e| PostError::Validation(e.to_string()))?;

        let event_id = parse_id(&request.event_id, "eventID")?;
        let post = request.updated_post.into_post()?;

        self.within(async {
            self.posts.insert(&post).await?;

            let appended = self.events.append_post(event_id, post.id).await;
            match appended {
                Ok(true) => Ok(()),
                Ok(false) => {
                    self.compensate(post.id).await;
                    Err(PostError::EventNotFound(event_id))
                }
                Err(e) => {
                    self.compensate(post.id).await;
                    Err(e)
                }
            }
        })
        .await?;

        tracing::info!(post_id = %post.id, "Post created and linked to event");

        Ok(CreatePostRequest {
            event_id: event_id.to_hex(),
            updated_post: PostInput::from(&post),
        })
    }

    /// Best-effort removal of a post whose event link could not be written.
    async fn compensate(&self, post_id: ObjectId) {
        match self.posts.delete(post_id).await {
            Ok(true) => tracing::warn!(%post_id, "Removed post after failed event append"),
            Ok(false) => tracing::warn!(%post_id, "Post to remove after failed event append was already gone"),
            Err(e) => {
                tracing::error!(%post_id, error = %e, "Failed to remove post after failed event append")
            }
        }
    }

    /// Posts referenced by the event, dispatched by kind.
    ///
    /// Posts with an unrecognized kind are skipped and logged.
    #[instrument(skip(self))]
    pub async fn list_event_posts(&self, event_id: ObjectId) -> PostResult<Vec<PostVariant>> {
        self.within(async {
            let event = self
                .events
                .find_event(event_id)
                .await?
                .ok_or(PostError::EventNotFound(event_id))?;

            if event.post_ids().is_empty() {
                return Ok(Vec::new());
            }

            let posts = self.posts.find_many(event.post_ids()).await?;
            let now = Utc::now();

            let variants = posts
                .into_iter()
                .filter_map(|post| match PostVariant::dispatch(post, now) {
                    Ok(variant) => Some(variant),
                    Err(unknown) => {
                        tracing::warn!(post_id = %unknown.id, kind = %unknown.kind, "Skipping post with unrecognized kind");
                        None
                    }
                })
                .collect();

            Ok(variants)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: ObjectId) -> PostResult<PostVariant> {
        self.within(async {
            let post = self
                .posts
                .find_by_id(post_id)
                .await?
                .ok_or(PostError::PostNotFound(post_id))?;

            Ok(PostVariant::dispatch(post, Utc::now())?)
        })
        .await
    }
}

impl<R: PostRepository, E: EventRepository> Clone for PostService<R, E> {
    fn clone(&self) -> Self {
        Self {
            posts: Arc::clone(&self.posts),
            events: Arc::clone(&self.events),
            deadline: self.deadline,
        }
    }
}

fn parse_id(raw: &str, field: &'static str) -> PostResult<ObjectId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(PostError::Validation(format!("{field} is required")));
    }
    ObjectId::parse_str(raw).map_err(|_| PostError::InvalidId(field))
}
