use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{write_store, ApiError};
use crate::models::{CreatePartyRequest, Party, UpdatePartyRequest};
use crate::state::AppState;

const PARTY_NOT_FOUND: &str = "Party not found";

/// POST /parties - 创建政党
pub async fn create_party(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreatePartyRequest>, JsonRejection>,
) -> Result<Json<Party>, ApiError> {
    let Json(req) = body?;
    let party = write_store(&state, move |store| {
        store.create_party(&req.name, &req.description, req.logo_url)
    })
    .await?;
    Ok(Json(party))
}

/// GET /parties - 政党列表
pub async fn list_parties(State(state): State<Arc<AppState>>) -> Json<Vec<Party>> {
    let parties = state.store.lock().list_parties();
    Json(parties)
}

/// GET /parties/:id
pub async fn get_party(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Party>, ApiError> {
    let party = state.store.lock().get_party(&id);
    party
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(PARTY_NOT_FOUND.to_string()))
}

/// PUT /parties/:id - 部分更新
///
/// Fields may come from the query string, a JSON body, or both (body wins).
/// A request without a JSON content type is query-only; a malformed or
/// mistyped JSON body is rejected with 422.
pub async fn update_party(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<UpdatePartyRequest>,
    body: Result<Json<UpdatePartyRequest>, JsonRejection>,
) -> Result<Json<Party>, ApiError> {
    let req = match body {
        Ok(Json(body)) => query.merge(body),
        Err(JsonRejection::MissingJsonContentType(_)) => query,
        Err(rejection) => return Err(rejection.into()),
    };

    let updated = write_store(&state, move |store| {
        store.update_party(&id, req.name, req.description, req.logo_url)
    })
    .await?;
    updated
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(PARTY_NOT_FOUND.to_string()))
}

/// DELETE /parties/:id - 删除政党（级联删除优劣势）
pub async fn delete_party(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !write_store(&state, move |store| store.delete_party(&id)).await? {
        return Err(ApiError::NotFound(PARTY_NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "status": "deleted" })))
}
