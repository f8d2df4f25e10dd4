pub mod config;
pub mod db_mongo;
pub mod error;
pub mod health;
pub mod logs;
pub mod meta_module;
pub mod ui;

pub use config::MongoLogsConfig;
pub use db_mongo::models::{AvailabilityRecord, LogRecord};
pub use error::{LookupError, LookupResult, StoreError};
pub use logs::MongoLogs;
pub use meta_module::{CUSTOM_LOG, LogsMetaModule, default_provider, default_provider_from};
