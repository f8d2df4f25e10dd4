use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};

use super::queries::clean_message;
use crate::error::StoreError;

/// One log line as shown in the web console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: i64,
    pub host: String,
    pub service: Option<String>,
    pub message: String,
}

impl LogRecord {
    /// Reshape a stored log document (`time`, `host_name`,
    /// `service_description`, `message`).
    pub fn from_document(document: &Document) -> Result<Self, StoreError> {
        let timestamp = match document.get("time") {
            Some(Bson::Int32(v)) => i64::from(*v),
            Some(Bson::Int64(v)) => *v,
            Some(Bson::Double(v)) => v.trunc() as i64,
            Some(other) => {
                return Err(StoreError::document(
                    "time",
                    format!("expected a number, found {:?}", other.element_type()),
                ));
            }
            None => return Err(StoreError::document("time", "missing")),
        };

        let host = document
            .get_str("host_name")
            .map_err(|e| StoreError::document("host_name", e.to_string()))?
            .to_string();

        let service = match document.get("service_description") {
            Some(Bson::String(s)) => Some(s.clone()),
            Some(Bson::Null) | None => None,
            Some(other) => {
                return Err(StoreError::document(
                    "service_description",
                    format!("expected a string, found {:?}", other.element_type()),
                ));
            }
        };

        let message = document
            .get_str("message")
            .map_err(|e| StoreError::document("message", e.to_string()))?;

        Ok(Self {
            timestamp,
            host,
            service,
            message: clean_message(message).to_string(),
        })
    }
}

/// A stored availability document without its `_id`.
///
/// The remaining fields (`day`, `day_ts`, `hostname`, `service` and the
/// metrics written upstream) are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AvailabilityRecord(Document);

impl AvailabilityRecord {
    pub fn from_document(mut document: Document) -> Self {
        document.remove("_id");
        Self(document)
    }

    pub fn get(&self, key: &str) -> Option<&Bson> {
        self.0.get(key)
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }
}
