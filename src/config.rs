use std::collections::HashMap;
use std::fmt;

use crate::error::StoreError;

pub const DEFAULT_URI: &str = "mongodb://localhost";
pub const DEFAULT_DATABASE: &str = "shinken";
pub const DEFAULT_LOGS_COLLECTION: &str = "logs";
pub const DEFAULT_HAV_COLLECTION: &str = "availability";

const ENV_PREFIX: &str = "MONGO_LOGS_";

/// Attribute keys understood by [`MongoLogsConfig::from_attrs`].
pub const ATTRIBUTE_KEYS: &[&str] = &[
    "uri",
    "replica_set",
    "database",
    "username",
    "password",
    "logs_collection",
    "hav_collection",
    "mongodb_fsync",
];

/// Connection settings for the logs and availability collections.
#[derive(Clone, PartialEq, Eq)]
pub struct MongoLogsConfig {
    pub uri: String,
    pub replica_set: Option<String>,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub logs_collection: String,
    pub hav_collection: String,
    /// Request journaled writes from the server.
    pub mongodb_fsync: bool,
}

impl Default for MongoLogsConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            replica_set: None,
            database: DEFAULT_DATABASE.to_string(),
            username: None,
            password: None,
            logs_collection: DEFAULT_LOGS_COLLECTION.to_string(),
            hav_collection: DEFAULT_HAV_COLLECTION.to_string(),
            mongodb_fsync: true,
        }
    }
}

impl MongoLogsConfig {
    /// Build a config from host module attributes. Missing keys keep their
    /// defaults and empty optional values count as unset.
    pub fn from_attrs(attrs: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| attrs.get(key).cloned().unwrap_or(default);
        let optional = |key: &str| attrs.get(key).filter(|v| !v.is_empty()).cloned();

        Self {
            uri: text("uri", defaults.uri),
            replica_set: optional("replica_set"),
            database: text("database", defaults.database),
            username: optional("username"),
            password: optional("password"),
            logs_collection: text("logs_collection", defaults.logs_collection),
            hav_collection: text("hav_collection", defaults.hav_collection),
            mongodb_fsync: attrs
                .get("mongodb_fsync")
                .map(|v| v == "True")
                .unwrap_or(defaults.mongodb_fsync),
        }
    }

    /// Read `MONGO_LOGS_<KEY>` variables, e.g. `MONGO_LOGS_URI`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`Self::from_env`], resolving variable names through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let attrs: HashMap<String, String> = ATTRIBUTE_KEYS
            .iter()
            .filter_map(|key| {
                lookup(&format!("{}{}", ENV_PREFIX, key.to_uppercase()))
                    .map(|value| (key.to_string(), value))
            })
            .collect();
        Self::from_attrs(&attrs)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if !self.uri.starts_with("mongodb://") && !self.uri.starts_with("mongodb+srv://") {
            return Err(StoreError::Config(format!(
                "unsupported uri scheme: {}",
                self.uri
            )));
        }
        if self.database.is_empty() {
            return Err(StoreError::Config("database name is empty".to_string()));
        }
        if self.logs_collection.is_empty() || self.hav_collection.is_empty() {
            return Err(StoreError::Config("collection name is empty".to_string()));
        }
        Ok(())
    }

    /// Username and password, only when both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }
}

impl fmt::Debug for MongoLogsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoLogsConfig")
            .field("uri", &self.uri)
            .field("replica_set", &self.replica_set)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("logs_collection", &self.logs_collection)
            .field("hav_collection", &self.hav_collection)
            .field("mongodb_fsync", &self.mongodb_fsync)
            .finish()
    }
}
