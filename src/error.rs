use thiserror::Error;

/// Errors raised by the log/availability store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A configuration value was rejected before connecting.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Building the client, reaching the server or authenticating failed.
    #[error("connection error: {0}")]
    Connection(#[source] mongodb::error::Error),

    /// A lookup was issued while no database handle exists.
    #[error("no database connection")]
    NotConnected,

    /// The driver failed while finding or iterating a cursor.
    #[error("query error: {0}")]
    Query(#[from] mongodb::error::Error),

    /// A stored document is missing a field or holds an unexpected type.
    #[error("malformed document field `{field}`: {reason}")]
    Document { field: &'static str, reason: String },
}

impl StoreError {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Config(_) => "config",
            StoreError::Connection(_) => "connection",
            StoreError::NotConnected => "not_connected",
            StoreError::Query(_) => "query",
            StoreError::Document { .. } => "document",
        }
    }

    pub(crate) fn document(field: &'static str, reason: impl Into<String>) -> Self {
        StoreError::Document {
            field,
            reason: reason.into(),
        }
    }
}

/// A failed lookup, carrying the records gathered before the failure.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct LookupError<T> {
    pub partial: Vec<T>,
    #[source]
    pub source: StoreError,
}

impl<T> LookupError<T> {
    pub fn new(partial: Vec<T>, source: StoreError) -> Self {
        Self { partial, source }
    }

    pub fn not_connected() -> Self {
        Self::new(Vec::new(), StoreError::NotConnected)
    }

    pub fn is_not_connected(&self) -> bool {
        matches!(self.source, StoreError::NotConnected)
    }
}

pub type LookupResult<T> = Result<Vec<T>, LookupError<T>>;
