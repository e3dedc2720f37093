//! Posts API routes

use axum::Router;
use domain_posts::{MongoEventRepository, MongoPostRepository, PostService, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let collections = &state.config.collections;

    let posts = MongoPostRepository::with_collection(&state.db, &collections.posts);
    let events = MongoEventRepository::with_collection(&state.db, &collections.events);

    let service =
        PostService::new(posts, events).with_deadline(state.config.server.request_timeout);

    handlers::router(service)
}
