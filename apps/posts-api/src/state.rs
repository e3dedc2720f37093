//! Application state management.
//!
//! Shared by the route builders at startup. Handlers receive domain
//! services, not this struct, except the readiness probe.

use mongodb::{Client, Database};

/// Shared application state.
///
/// Cloning is cheap: the driver types share one connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// Database holding the posts and events collections
    pub db: Database,
}
