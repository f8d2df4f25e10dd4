use std::future::Future;

use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use mongodb::Database;
use mongodb::bson::Document;

use crate::error::StoreError;

pub type DocumentStream = BoxStream<'static, Result<Document, StoreError>>;

/// Something that can run a sorted find against a named collection.
pub trait DocumentSource: Send + Sync {
    fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Document,
    ) -> impl Future<Output = Result<DocumentStream, StoreError>> + Send;
}

/// Finds backed by a MongoDB database handle.
#[derive(Debug, Clone)]
pub struct MongoSource {
    db: Database,
}

impl MongoSource {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl DocumentSource for MongoSource {
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Document,
    ) -> Result<DocumentStream, StoreError> {
        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter)
            .sort(sort)
            .await?;

        Ok(cursor.map_err(StoreError::Query).boxed())
    }
}
