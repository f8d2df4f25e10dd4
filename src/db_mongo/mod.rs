pub mod models;
pub mod queries;
pub mod source;

#[cfg(test)]
pub(crate) mod memory;

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Credential, WriteConcern};
use mongodb::{Client, Database};

use crate::config::MongoLogsConfig;
use crate::error::StoreError;

/// Create a MongoDB client from the module configuration.
///
/// The driver connects lazily, so this only fails on a bad URI or options.
pub async fn create_client(config: &MongoLogsConfig) -> Result<Client, StoreError> {
    let mut options = ClientOptions::parse(&config.uri)
        .await
        .map_err(StoreError::Connection)?;

    if let Some(replica_set) = &config.replica_set {
        options.repl_set_name = Some(replica_set.clone());
    }

    if config.mongodb_fsync {
        options.write_concern = Some(WriteConcern::builder().journal(true).build());
    }

    if let Some((username, password)) = config.credentials() {
        options.credential = Some(
            Credential::builder()
                .username(username.to_string())
                .password(password.to_string())
                .source(config.database.clone())
                .build(),
        );
    }

    let client = Client::with_options(options).map_err(StoreError::Connection)?;
    tracing::info!("MongoDB client created for {}", config.uri);
    Ok(client)
}

/// Get database handle
pub fn get_database(client: &Client, db_name: &str) -> Database {
    client.database(db_name)
}

/// Ping to verify the server is reachable and the credentials are accepted.
pub async fn ping(db: &Database) -> Result<(), StoreError> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(StoreError::Connection)?;
    Ok(())
}
