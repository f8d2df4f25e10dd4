use std::future::Future;

use crate::config::MongoLogsConfig;
use crate::db_mongo::models::{AvailabilityRecord, LogRecord};
use crate::db_mongo::source::{DocumentSource, MongoSource};
use crate::error::{LookupResult, StoreError};
use crate::logs::MongoLogs;

/// Message for the web console when no logs store is usable.
pub const CUSTOM_LOG: &str = "You should configure the module 'mongo-logs' in your broker to be able to display logs and availability.";

/// Picks the logs store used by the web console.
///
/// Only one store makes sense, so the first configured one wins. With none
/// configured, the default provider is asked for one.
pub struct LogsMetaModule<S = MongoSource> {
    module: Option<MongoLogs<S>>,
}

impl<S: DocumentSource> LogsMetaModule<S> {
    /// `default_provider` is only awaited when `modules` is empty. Its failure
    /// is logged and leaves the selector unavailable.
    pub async fn new<F>(modules: Vec<MongoLogs<S>>, default_provider: F) -> Self
    where
        F: Future<Output = Result<MongoLogs<S>, StoreError>>,
    {
        if modules.len() > 1 {
            tracing::warn!(
                "Too many logs modules declared ({} > 1), using the first one",
                modules.len()
            );
        }

        let module = match modules.into_iter().next() {
            Some(module) => Some(module),
            None => match default_provider.await {
                Ok(module) => Some(module),
                Err(e) => {
                    tracing::warn!("no default logs module: {}", e);
                    None
                }
            },
        };

        Self { module }
    }

    pub fn is_available(&self) -> bool {
        self.module.is_some()
    }

    pub fn module(&self) -> Option<&MongoLogs<S>> {
        self.module.as_ref()
    }

    pub fn module_mut(&mut self) -> Option<&mut MongoLogs<S>> {
        self.module.as_mut()
    }

    /// Log records, or `default` when there are none to show.
    pub async fn get_ui_logs(
        &self,
        name: Option<&str>,
        logs_type: Option<&[String]>,
        default: Option<Vec<LogRecord>>,
        range_start: Option<i64>,
        range_end: Option<i64>,
    ) -> Option<Vec<LogRecord>> {
        match &self.module {
            Some(module) => or_default(
                module.get_ui_logs(name, logs_type, range_start, range_end).await,
                default,
            ),
            None => default,
        }
    }

    /// Availability records, or `default` when there are none to show.
    pub async fn get_ui_availability(
        &self,
        name: Option<&str>,
        range_start: Option<i64>,
        range_end: Option<i64>,
        default: Option<Vec<AvailabilityRecord>>,
    ) -> Option<Vec<AvailabilityRecord>> {
        match &self.module {
            Some(module) => or_default(
                module.get_ui_availability(name, range_start, range_end).await,
                default,
            ),
            None => default,
        }
    }
}

// Partial records from a failed query are still shown.
fn or_default<T>(result: LookupResult<T>, default: Option<Vec<T>>) -> Option<Vec<T>> {
    let records = match result {
        Ok(records) => records,
        Err(e) => e.partial,
    };
    if records.is_empty() { default } else { Some(records) }
}

/// Build the fallback store from `MONGO_LOGS_*` environment settings.
pub async fn default_provider() -> Result<MongoLogs, StoreError> {
    default_provider_from(|name| std::env::var(name).ok()).await
}

/// [`default_provider`] with variables resolved through `lookup`.
pub async fn default_provider_from(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<MongoLogs, StoreError> {
    MongoLogs::new(MongoLogsConfig::from_lookup(lookup)).await
}
