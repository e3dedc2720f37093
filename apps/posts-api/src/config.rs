use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_posts::mongodb::{DEFAULT_EVENTS_COLLECTION, DEFAULT_POSTS_COLLECTION};

pub use core_config::Environment;

/// Collection names the posts domain reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionsConfig {
    pub posts: String,
    pub events: String,
}

impl FromEnv for CollectionsConfig {
    /// - POSTS_COLLECTION: defaults to `posts`
    /// - EVENTS_COLLECTION: defaults to `events`
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            posts: env_or_default("POSTS_COLLECTION", DEFAULT_POSTS_COLLECTION),
            events: env_or_default("EVENTS_COLLECTION", DEFAULT_EVENTS_COLLECTION),
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub collections: CollectionsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let mongodb = match mongodb.app_name {
            Some(_) => mongodb,
            None => mongodb.with_app_name(app.name),
        };
        let server = ServerConfig::from_env()?;
        let collections = CollectionsConfig::from_env()?;

        Ok(Self {
            app,
            mongodb,
            server,
            collections,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const REQUIRED: [(&str, Option<&str>); 2] = [
        ("MONGODB_URL", Some("mongodb://localhost:27017")),
        ("MONGODB_DATABASE", Some("cpeevent")),
    ];

    #[test]
    fn test_config_defaults() {
        let vars = REQUIRED.into_iter().chain([
            ("MONGODB_APP_NAME", None),
            ("POSTS_COLLECTION", None),
            ("EVENTS_COLLECTION", None),
            ("REQUEST_TIMEOUT_SECS", None),
            ("PORT", None),
        ]).collect::<Vec<_>>();
        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.app.name, "posts_api");
            assert_eq!(config.mongodb.database(), "cpeevent");
            assert_eq!(config.mongodb.app_name.as_deref(), Some("posts_api"));
            assert_eq!(config.collections.posts, "posts");
            assert_eq!(config.collections.events, "events");
            assert_eq!(config.server.request_timeout, Duration::from_secs(100));
        });
    }

    #[test]
    fn test_config_overrides() {
        let vars = REQUIRED.into_iter().chain([
            ("MONGODB_APP_NAME", Some("cpe-posts")),
            ("POSTS_COLLECTION", Some("posts_v2")),
            ("EVENTS_COLLECTION", Some("events_v2")),
            ("REQUEST_TIMEOUT_SECS", Some("10")),
        ]).collect::<Vec<_>>();
        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.mongodb.app_name.as_deref(), Some("cpe-posts"));
            assert_eq!(config.collections.posts, "posts_v2");
            assert_eq!(config.collections.events, "events_v2");
            assert_eq!(config.server.request_timeout, Duration::from_secs(10));
        });
    }

    #[test]
    fn test_config_requires_mongodb_url() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None),
                ("MONGODB_DATABASE", Some("cpeevent")),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("MONGODB_URL"));
            },
        );
    }
}
