use std::sync::OnceLock;

use mongodb::bson::{Document, doc};

/// Split `host/service` at the first `/`.
pub fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.split_once('/') {
        Some((host, service)) => (host, Some(service)),
        None => (name, None),
    }
}

/// Drop a leading `[<digits>] ` timestamp from a log message.
///
/// Messages without that prefix, or with nothing after it, are returned as is.
pub fn clean_message(message: &str) -> &str {
    static PREFIX: OnceLock<regex::Regex> = OnceLock::new();

    let prefix = PREFIX.get_or_init(|| {
        regex::Regex::new(r"(?s)^\[\d+\] (.+)$").expect("failed to compile message prefix regex")
    });

    prefix
        .captures(message)
        .and_then(|caps| caps.get(1))
        .map(|text| text.as_str())
        .unwrap_or(message)
}

// A bound of 0 counts as unset.
fn bound(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

/// Conjunctive clauses for the logs collection, in a fixed order.
pub fn logs_filter(
    host: Option<&str>,
    service: Option<&str>,
    logs_type: Option<&[String]>,
    range_start: Option<i64>,
    range_end: Option<i64>,
) -> Vec<Document> {
    let mut query = Vec::new();

    if let Some(host) = host {
        query.push(doc! { "host_name": { "$in": [host] } });
    }
    if let Some(service) = service {
        query.push(doc! { "service_description": { "$in": [service] } });
    }
    if let Some(types) = logs_type.filter(|t| t.first().is_some_and(|first| !first.is_empty())) {
        query.push(doc! { "type": { "$in": types.to_vec() } });
    }
    if let Some(start) = bound(range_start) {
        query.push(doc! { "time": { "$gte": start } });
    }
    if let Some(end) = bound(range_end) {
        query.push(doc! { "time": { "$lte": end } });
    }

    query
}

/// Conjunctive clauses for the availability collection.
pub fn availability_filter(
    host: Option<&str>,
    service: Option<&str>,
    range_start: Option<i64>,
    range_end: Option<i64>,
) -> Vec<Document> {
    let mut query = Vec::new();

    if let Some(host) = host {
        query.push(doc! { "hostname": { "$in": [host] } });
    }
    if let Some(service) = service {
        query.push(doc! { "service": { "$in": [service] } });
    }
    if let Some(start) = bound(range_start) {
        query.push(doc! { "day_ts": { "$gte": start } });
    }
    if let Some(end) = bound(range_end) {
        query.push(doc! { "day_ts": { "$lte": end } });
    }

    query
}

/// Wrap clauses into a find filter; no clauses selects everything.
pub fn and_filter(clauses: Vec<Document>) -> Document {
    if clauses.is_empty() {
        doc! {}
    } else {
        doc! { "$and": clauses }
    }
}

/// Sort for the logs collection. The unfiltered scan keys on `day`, not `time`.
pub fn logs_sort(filtered: bool) -> Document {
    if filtered {
        doc! { "time": -1 }
    } else {
        doc! { "day": -1 }
    }
}

pub fn availability_sort() -> Document {
    doc! { "day": -1, "hostname": 1, "service": 1 }
}
