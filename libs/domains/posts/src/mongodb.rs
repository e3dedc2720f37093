//! MongoDB implementations of the post and event repositories

use async_trait::async_trait;
use database::mongodb::open_collection;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{self, Document, doc, oid::ObjectId},
};
use tracing::{instrument, warn};

use crate::error::PostResult;
use crate::models::{Event, Post};
use crate::repository::{EventRepository, PostRepository};

pub const DEFAULT_POSTS_COLLECTION: &str = "posts";
pub const DEFAULT_EVENTS_COLLECTION: &str = "events";

pub struct MongoPostRepository {
    collection: Collection<Post>,
}

impl MongoPostRepository {
    /// Repository over the default `posts` collection
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoPostRepository::new(&client.database("cpeevent"));
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_POSTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: open_collection(db, collection_name),
        }
    }

    pub fn collection(&self) -> &Collection<Post> {
        &self.collection
    }

    fn in_filter(ids: &[ObjectId]) -> Document {
        doc! { "_id": { "$in": ids.to_vec() } }
    }

    /// Decodes each document on its own; one malformed post is logged and
    /// skipped instead of failing the whole batch.
    fn decode_posts(documents: Vec<Document>) -> Vec<Post> {
        documents
            .into_iter()
            .filter_map(|document| {
                let id = document.get_object_id("_id").ok();
                match bson::from_document::<Post>(document) {
                    Ok(post) => Some(post),
                    Err(e) => {
                        warn!(post_id = ?id, error = %e, "Skipping undecodable post");
                        None
                    }
                }
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    #[instrument(skip(self, post), fields(post_id = %post.id, kind = %post.kind))]
    async fn insert(&self, post: &Post) -> PostResult<()> {
        self.collection.insert_one(post).await?;
        tracing::info!("Post inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> PostResult<Option<Post>> {
        let post = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(post)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_many(&self, ids: &[ObjectId]) -> PostResult<Vec<Post>> {
        let cursor = self
            .collection
            .clone_with_type::<Document>()
            .find(Self::in_filter(ids))
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(Self::decode_posts(documents))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> PostResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_EVENTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: open_collection(db, collection_name),
        }
    }

    /// Update pipeline appending `post_id` to `postList` unless present.
    ///
    /// Works when `postList` is missing or `null`, which `$addToSet`
    /// rejects. Existing order is kept.
    fn append_update(post_id: ObjectId) -> Vec<Document> {
        let current = doc! { "$ifNull": ["$postList", []] };
        vec![doc! {
            "$set": {
                "postList": {
                    "$cond": [
                        { "$in": [post_id, current.clone()] },
                        current.clone(),
                        { "$concatArrays": [current, [post_id]] },
                    ]
                }
            }
        }]
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self))]
    async fn find_event(&self, id: ObjectId) -> PostResult<Option<Event>> {
        let event = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(event)
    }

    #[instrument(skip(self))]
    async fn append_post(&self, event_id: ObjectId, post_id: ObjectId) -> PostResult<bool> {
        let result = self
            .collection
            .update_one(doc! { "_id": event_id }, Self::append_update(post_id))
            .await?;

        Ok(result.matched_count > 0)
    }
}
