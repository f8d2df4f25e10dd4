use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::db_mongo::source::DocumentSource;
use crate::meta_module::LogsMetaModule;

#[derive(Serialize)]
pub struct HealthCheckResponse {
    status: String,
    store: String,
}

pub async fn health_check<S: DocumentSource>(
    State(meta): State<Arc<LogsMetaModule<S>>>,
) -> Json<HealthCheckResponse> {
    let store = if meta.is_available() { "available" } else { "unavailable" };
    let response = HealthCheckResponse {
        status: "ok".to_string(),
        store: store.to_string(),
    };
    Json(response)
}
