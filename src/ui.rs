//! JSON views of logs and availability for the web console.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::db_mongo::source::DocumentSource;
use crate::error::{LookupResult, StoreError};
use crate::health::health_check;
use crate::meta_module::{CUSTOM_LOG, LogsMetaModule};

#[derive(Debug, Deserialize)]
pub struct LogsQueryParams {
    /// Comma separated log types, e.g. `HOST ALERT,SERVICE ALERT`.
    pub logs_type: Option<String>,
    pub range_start: Option<i64>,
    pub range_end: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQueryParams {
    pub range_start: Option<i64>,
    pub range_end: Option<i64>,
}

pub fn router<S: DocumentSource + 'static>(meta: Arc<LogsMetaModule<S>>) -> Router {
    Router::new()
        .route("/health", get(health_check::<S>))
        .route("/logs/{*name}", get(get_logs::<S>))
        .route("/availability/{*name}", get(get_availability::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(meta)
}

fn unavailable(cause: Option<&StoreError>) -> Response {
    let body = Json(json!({
        "error": CUSTOM_LOG,
        "cause": cause.map(StoreError::kind),
    }));
    (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
}

// An empty success is "no data"; a failure that read nothing is "unreachable".
fn respond<T: Serialize>(result: LookupResult<T>) -> Response {
    match result {
        Ok(records) => Json(records).into_response(),
        Err(e) if !e.partial.is_empty() => Json(e.partial).into_response(),
        Err(e) => unavailable(Some(&e.source)),
    }
}

pub async fn get_logs<S: DocumentSource>(
    State(meta): State<Arc<LogsMetaModule<S>>>,
    Path(name): Path<String>,
    Query(params): Query<LogsQueryParams>,
) -> Response {
    let Some(module) = meta.module() else {
        return unavailable(None);
    };

    let logs_type: Option<Vec<String>> = params
        .logs_type
        .map(|types| types.split(',').map(|t| t.trim().to_string()).collect());

    let result = module
        .get_ui_logs(
            Some(&name),
            logs_type.as_deref(),
            params.range_start,
            params.range_end,
        )
        .await;

    respond(result)
}

pub async fn get_availability<S: DocumentSource>(
    State(meta): State<Arc<LogsMetaModule<S>>>,
    Path(name): Path<String>,
    Query(params): Query<AvailabilityQueryParams>,
) -> Response {
    let Some(module) = meta.module() else {
        return unavailable(None);
    };

    let result = module
        .get_ui_availability(Some(&name), params.range_start, params.range_end)
        .await;

    respond(result)
}
