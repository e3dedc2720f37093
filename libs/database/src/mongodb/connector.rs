use mongodb::{Client, Collection, Database, bson::doc, options::ClientOptions};
use tracing::{debug, info};

use super::MongoConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};

/// Build a client from `config` and verify it with a `ping` against the
/// configured database.
///
/// ```ignore
/// use database::mongodb::{MongoConfig, connect_from_config};
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "cpe");
/// let client = connect_from_config(&config).await?;
/// ```
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    info!(url = %config.redacted_url(), "Attempting to connect to MongoDB");

    let mut options = ClientOptions::parse(config.url()).await?;
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(config.connect_timeout());
    options.server_selection_timeout = Some(config.server_selection_timeout());
    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;

    client
        .database(config.database())
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!(database = config.database(), "Successfully connected to MongoDB");
    Ok(client)
}

/// [`connect_from_config`] wrapped in exponential backoff, for startup.
///
/// `None` uses [`RetryConfig::default`].
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<Client> {
    match retry_config {
        Some(policy) => {
            retry_with_backoff("mongodb.connect", || connect_from_config(config), policy).await
        }
        None => retry("mongodb.connect", || connect_from_config(config)).await,
    }
}

/// Open a typed handle on a named collection.
///
/// Handles are cheap; they share the client's connection pool.
pub fn open_collection<T>(db: &Database, name: &str) -> Collection<T>
where
    T: Send + Sync,
{
    debug!(database = db.name(), collection = name, "Opening collection");
    db.collection::<T>(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let config = MongoConfig::with_database("not-a-mongo-url", "test");
        let err = connect_from_config(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Mongo(_)));
    }

    #[tokio::test]
    async fn test_open_collection_keeps_names() {
        let client = Client::with_uri_str("mongodb://localhost:27017").await.unwrap();
        let db = client.database("cpe");
        let posts = open_collection::<mongodb::bson::Document>(&db, "posts");
        assert_eq!(posts.name(), "posts");
        assert_eq!(posts.namespace().db, "cpe");
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect_from_config() {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let config = MongoConfig::with_database(url, "test");
        assert!(connect_from_config(&config).await.is_ok());
    }
}
