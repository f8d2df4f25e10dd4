use futures::StreamExt;
use mongodb::bson::Document;

use crate::config::MongoLogsConfig;
use crate::db_mongo::{
    self,
    models::{AvailabilityRecord, LogRecord},
    queries,
    source::{DocumentSource, MongoSource},
};
use crate::error::{LookupError, LookupResult, StoreError};

/// Reads Shinken-style logs and host/service availability from MongoDB.
pub struct MongoLogs<S = MongoSource> {
    config: MongoLogsConfig,
    source: Option<S>,
    connected: bool,
}

impl MongoLogs<MongoSource> {
    /// Validate the config and try to connect right away.
    ///
    /// Only a bad config is an error. A store that cannot reach the server is
    /// still returned, disconnected, and can be retried with [`Self::open`].
    pub async fn new(config: MongoLogsConfig) -> Result<Self, StoreError> {
        tracing::info!("mongo uri: {}", config.uri);
        if let Some(replica_set) = &config.replica_set {
            tracing::info!("replica set: {}", replica_set);
        }
        tracing::info!("database: {}", config.database);
        tracing::info!("logs collection: {}", config.logs_collection);
        tracing::info!("hosts availability collection: {}", config.hav_collection);
        config.validate()?;

        let mut store = Self {
            config,
            source: None,
            connected: false,
        };
        tracing::info!(
            "Trying to open a MongoDB connection to {}, database: {}",
            store.config.uri,
            store.config.database
        );
        store.open().await;
        Ok(store)
    }

    /// (Re)connect. Failures are logged and leave the store disconnected.
    pub async fn open(&mut self) -> bool {
        self.connected = match self.try_open().await {
            Ok(()) => {
                tracing::info!("database connection established");
                true
            }
            Err(e) => {
                tracing::warn!(kind = e.kind(), "failed to open database connection");
                tracing::warn!("{:?}", anyhow::Error::new(e));
                false
            }
        };
        self.connected
    }

    async fn try_open(&mut self) -> Result<(), StoreError> {
        let client = db_mongo::create_client(&self.config).await?;
        let db = db_mongo::get_database(&client, &self.config.database);
        tracing::info!("using database: {}", self.config.database);
        self.source = Some(MongoSource::new(db.clone()));

        db_mongo::ping(&db).await?;
        if let Some((username, _)) = self.config.credentials() {
            tracing::info!("user authenticated: {}", username);
        }
        Ok(())
    }
}

impl<S: DocumentSource> MongoLogs<S> {
    /// Build a store over an existing source. `None` gives a store with no
    /// database handle.
    pub fn with_source(config: MongoLogsConfig, source: Option<S>) -> Self {
        let connected = source.is_some();
        Self {
            config,
            source,
            connected,
        }
    }

    pub fn config(&self) -> &MongoLogsConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn close(&mut self) {
        self.connected = false;
        self.source = None;
        tracing::info!("database connection closed");
    }

    /// Logs for `host` or `host/service`, newest first.
    pub async fn get_ui_logs(
        &self,
        name: Option<&str>,
        logs_type: Option<&[String]>,
        range_start: Option<i64>,
        range_end: Option<i64>,
    ) -> LookupResult<LogRecord> {
        let Some(source) = &self.source else {
            tracing::error!("no database connection, problem during init phase");
            return Err(LookupError::not_connected());
        };

        tracing::info!("get_ui_logs, name: {:?}", name);
        let (host, service) = split_optional(name);
        tracing::debug!("get_ui_logs, host/service: {:?}/{:?}", host, service);

        let clauses = queries::logs_filter(host, service, logs_type, range_start, range_end);
        let filtered = !clauses.is_empty();
        if filtered {
            tracing::debug!("fetching logs with query: {:?}", clauses);
        }

        let mut records = Vec::new();
        let result = fetch(
            source,
            &self.config.logs_collection,
            queries::and_filter(clauses),
            queries::logs_sort(filtered),
            &mut records,
            |document| LogRecord::from_document(&document),
        )
        .await;

        finish("logs", records, result)
    }

    /// Availability for `host` or `host/service`, latest day first.
    pub async fn get_ui_availability(
        &self,
        name: Option<&str>,
        range_start: Option<i64>,
        range_end: Option<i64>,
    ) -> LookupResult<AvailabilityRecord> {
        let Some(source) = &self.source else {
            tracing::error!("no database connection, problem during init phase");
            return Err(LookupError::not_connected());
        };

        tracing::debug!("get_ui_availability, name: {:?}", name);
        let (host, service) = split_optional(name);
        tracing::debug!("get_ui_availability, host/service: {:?}/{:?}", host, service);

        let clauses = queries::availability_filter(host, service, range_start, range_end);
        if !clauses.is_empty() {
            tracing::debug!("fetching availability with query: {:?}", clauses);
        }

        let mut records = Vec::new();
        let result = fetch(
            source,
            &self.config.hav_collection,
            queries::and_filter(clauses),
            queries::availability_sort(),
            &mut records,
            |document| Ok(AvailabilityRecord::from_document(document)),
        )
        .await;

        finish("availability", records, result)
    }
}

fn split_optional(name: Option<&str>) -> (Option<&str>, Option<&str>) {
    match name.map(queries::split_name) {
        Some((host, service)) => (Some(host), service),
        None => (None, None),
    }
}

async fn fetch<S, T, F>(
    source: &S,
    collection: &str,
    filter: Document,
    sort: Document,
    records: &mut Vec<T>,
    reshape: F,
) -> Result<(), StoreError>
where
    S: DocumentSource,
    F: Fn(Document) -> Result<T, StoreError>,
{
    let mut cursor = source.find(collection, filter, sort).await?;
    while let Some(document) = cursor.next().await {
        records.push(reshape(document?)?);
    }
    Ok(())
}

fn finish<T>(what: &str, records: Vec<T>, result: Result<(), StoreError>) -> LookupResult<T> {
    match result {
        Ok(()) => {
            tracing::info!("{} {} records fetched from database", records.len(), what);
            Ok(records)
        }
        Err(e) => {
            tracing::error!(
                kind = e.kind(),
                "error when querying {} ({} records kept): {}",
                what,
                records.len(),
                e
            );
            Err(LookupError::new(records, e))
        }
    }
}
