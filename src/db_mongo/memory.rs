//! In-memory [`DocumentSource`] used by unit tests.
//!
//! Evaluates the subset of the query language the store emits (`$and` of
//! `$in`/`$gte`/`$lte` clauses), applies sort specs and can fail a cursor
//! after a number of documents.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use futures::StreamExt;
use mongodb::bson::{Bson, Document};

use super::source::{DocumentSource, DocumentStream};
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq)]
pub struct FindCall {
    pub collection: String,
    pub filter: Document,
    pub sort: Document,
}

#[derive(Default)]
pub struct MemorySource {
    collections: HashMap<String, Vec<Document>>,
    fail_after: Option<usize>,
    calls: Mutex<Vec<FindCall>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: &str, documents: Vec<Document>) -> Self {
        self.collections.insert(name.to_string(), documents);
        self
    }

    /// Make every cursor error after yielding `count` documents.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    pub fn calls(&self) -> Vec<FindCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl DocumentSource for MemorySource {
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        sort: Document,
    ) -> Result<DocumentStream, StoreError> {
        let mut matched: Vec<Document> = self
            .collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, &filter)).cloned().collect())
            .unwrap_or_default();
        matched.sort_by(|a, b| compare_by_spec(a, b, &sort));

        self.calls.lock().unwrap().push(FindCall {
            collection: collection.to_string(),
            filter,
            sort,
        });

        let mut items: Vec<Result<Document, StoreError>> = matched.into_iter().map(Ok).collect();
        if let Some(count) = self.fail_after {
            items.truncate(count);
            let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "cursor reset");
            items.push(Err(StoreError::Query(mongodb::error::Error::from(reset))));
        }

        Ok(futures::stream::iter(items).boxed())
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    if filter.is_empty() {
        return true;
    }
    match filter.get_array("$and") {
        Ok(clauses) => clauses
            .iter()
            .all(|c| c.as_document().is_some_and(|c| matches_clause(document, c))),
        Err(_) => matches_clause(document, filter),
    }
}

fn matches_clause(document: &Document, clause: &Document) -> bool {
    clause.iter().all(|(field, condition)| {
        let value = document.get(field);
        let Some(condition) = condition.as_document() else {
            return value == Some(condition);
        };
        condition.iter().all(|(op, operand)| match op.as_str() {
            "$in" => operand
                .as_array()
                .is_some_and(|set| value.is_some_and(|v| set.contains(v))),
            "$gte" => value.and_then(|v| compare(v, operand)).is_some_and(Ordering::is_ge),
            "$lte" => value.and_then(|v| compare(v, operand)).is_some_and(Ordering::is_le),
            _ => false,
        })
    })
}

fn number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (number(a), number(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

// Missing and null sort before numbers, numbers before strings.
fn rank(value: Option<&Bson>) -> u8 {
    match value {
        None | Some(Bson::Null) => 0,
        Some(v) if number(v).is_some() => 1,
        Some(Bson::String(_)) => 2,
        Some(_) => 3,
    }
}

fn compare_by_spec(a: &Document, b: &Document, sort: &Document) -> Ordering {
    for (key, direction) in sort {
        let (left, right) = (a.get(key), b.get(key));
        let ordering = rank(left).cmp(&rank(right)).then_with(|| match (left, right) {
            (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        });
        let ordering = if number(direction).is_some_and(|d| d < 0.0) {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
