pub mod dashboard;
pub mod forces;
pub mod parties;
pub mod search;
pub mod server;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;
use crate::search::SearchError;
use crate::state::AppState;
use crate::store::{Store, StoreError};

/// API error, rendered as `{"detail": "..."}` / 接口错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    /// Body the extractor refused (422 for malformed or mistyped JSON) / 请求体无效
    Rejected(StatusCode, String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Rejected(status, msg) => (status, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        tracing::error!("Store error: {}", e);
        ApiError::Internal(format!("Failed to save data: {}", e))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Unparsable and mistyped bodies are both validation failures
        let status = match rejection {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => rejection.status(),
        };
        ApiError::Rejected(status, rejection.body_text())
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        tracing::error!("Search error: {}", e);
        ApiError::Internal(e.to_string())
    }
}

/// Run a store mutation off the async workers / 在阻塞线程中执行存储写操作
///
/// Saves fsync and rename under the store lock, so they go through
/// `spawn_blocking`; the lock still serializes every writer.
pub(crate) async fn write_store<F, R>(state: &Arc<AppState>, f: F) -> Result<R, ApiError>
where
    F: FnOnce(&mut Store) -> Result<R, StoreError> + Send + 'static,
    R: Send + 'static,
{
    let state = Arc::clone(state);
    let result = tokio::task::spawn_blocking(move || {
        let mut store = state.store.lock();
        f(&mut store)
    })
    .await
    .map_err(|e| {
        tracing::error!("Store task failed: {}", e);
        ApiError::Internal(format!("Store task failed: {}", e))
    })?;
    Ok(result?)
}

/// CORS from config, permissive when no origin (or "*") is listed / 跨域配置
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Create the HTTP router / 创建路由
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        .route("/health", get(server::health_check))
        .route("/dashboard-summary", get(dashboard::get_dashboard_summary))
        .route("/parties", get(parties::list_parties).post(parties::create_party))
        .route(
            "/parties/:id",
            get(parties::get_party)
                .put(parties::update_party)
                .delete(parties::delete_party),
        )
        .route("/forces-faiblesses", post(forces::add_strength_weakness))
        // GET takes a party id, DELETE a strength/weakness id
        .route(
            "/forces-faiblesses/:id",
            get(forces::list_strengths_weaknesses).delete(forces::delete_strength_weakness),
        )
        .route("/add-document", post(search::add_document))
        .route("/search", post(search::search))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_cors_preflight_allows_configured_origin() {
        let (_dir, app) = test_support::test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/parties")
                    .header("origin", "http://localhost:5173")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
    }

    #[test]
    fn test_api_error_status() {
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Rejected(StatusCode::UNPROCESSABLE_ENTITY, "x".into())
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
