use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{write_store, ApiError};
use crate::models::{CreateStrengthWeaknessRequest, StrengthWeakness};
use crate::state::AppState;
use crate::store::NewStrengthWeakness;

/// POST /forces-faiblesses - 新增优劣势
pub async fn add_strength_weakness(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateStrengthWeaknessRequest>, JsonRejection>,
) -> Result<Json<StrengthWeakness>, ApiError> {
    let Json(req) = body?;
    let new = NewStrengthWeakness {
        party_id: req.party_id,
        kind: req.kind,
        content: req.content,
        date: req.date,
        source: req.source,
        author: req.author,
    };
    let created = write_store(&state, move |store| store.add_strength_weakness(new)).await?;

    created
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Party not found".to_string()))
}

/// GET /forces-faiblesses/:party_id - 某政党的优劣势
pub async fn list_strengths_weaknesses(
    State(state): State<Arc<AppState>>,
    Path(party_id): Path<String>,
) -> Json<Vec<StrengthWeakness>> {
    let items = state.store.lock().list_strengths_weaknesses(&party_id);
    Json(items)
}

/// DELETE /forces-faiblesses/:id
pub async fn delete_strength_weakness(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !write_store(&state, move |store| store.delete_strength_weakness(&id)).await? {
        return Err(ApiError::NotFound("Item not found".to_string()));
    }
    Ok(Json(json!({ "status": "deleted" })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::api::test_support::{send, send_raw, test_app};

    #[tokio::test]
    async fn test_cascade_over_http() {
        let (_dir, app) = test_app();
        let (_, party) = send(
            &app,
            "POST",
            "/parties",
            Some(json!({"name": "Alpha", "description": "d"})),
        )
        .await;
        let party_id = party["id"].as_str().unwrap().to_string();

        let (status, sw) = send(
            &app,
            "POST",
            "/forces-faiblesses",
            Some(json!({
                "party_id": party_id,
                "kind": "force",
                "content": "strong base",
                "date": "2024-01-10"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sw["date"], "2024-01-10");
        assert!(sw["source"].is_null());

        let (status, list) = send(&app, "GET", &format!("/forces-faiblesses/{}", party_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list, json!([sw]));

        let (status, _) = send(&app, "DELETE", &format!("/parties/{}", party_id), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, list) = send(&app, "GET", &format!("/forces-faiblesses/{}", party_id), None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_legacy_payload_and_unknown_party() {
        let (_dir, app) = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/forces-faiblesses",
            Some(json!({
                "party_id": "nonexistent",
                "type": "faiblesse",
                "contenu": "x",
                "date_": "2024-01-10",
                "auteur": "Awa"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Party not found");
    }

    #[tokio::test]
    async fn test_invalid_kind_is_rejected() {
        let (_dir, app) = test_app();
        let (status, _) = send(
            &app,
            "POST",
            "/forces-faiblesses",
            Some(json!({
                "party_id": "p",
                "kind": "neutre",
                "content": "x",
                "date": "2024-01-10"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_delete_strength_weakness() {
        let (_dir, app) = test_app();
        let (_, party) = send(
            &app,
            "POST",
            "/parties",
            Some(json!({"name": "Alpha", "description": "d"})),
        )
        .await;
        let (_, sw) = send(
            &app,
            "POST",
            "/forces-faiblesses",
            Some(json!({
                "party_id": party["id"],
                "kind": "faiblesse",
                "content": "x",
                "date": "2024-01-10"
            })),
        )
        .await;
        let sw_id = sw["id"].as_str().unwrap();

        let (status, _) = send(&app, "DELETE", &format!("/forces-faiblesses/{}", sw_id), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, "DELETE", &format!("/forces-faiblesses/{}", sw_id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Item not found");
    }

    #[tokio::test]
    async fn test_truncated_body_is_rejected() {
        let (_dir, app) = test_app();
        let status = send_raw(&app, "POST", "/forces-faiblesses", r#"{"party_id": "p", "kind""#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
