use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::ApiError;
use crate::search::SearchResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddDocumentRequest {
    pub doc_id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub n_results: Option<usize>,
}

/// POST /add-document - 索引文档
pub async fn add_document(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AddDocumentRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = body?;
    state
        .rag
        .add_document(&req.doc_id, &req.text)
        .await
        .map_err(|e| {
            tracing::error!("Indexing of {} failed: {}", req.doc_id, e);
            ApiError::Internal(format!("Indexing failed: {}", e))
        })?;
    Ok(Json(json!({ "status": "ok" })))
}

/// POST /search - 检索
pub async fn search(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(req) = body?;
    let n_results = req
        .n_results
        .unwrap_or(state.config.search.default_results);
    let results = state.rag.search(&req.query, n_results).await?;
    Ok(Json(results))
}
