use axum::{extract::State, Json};
use std::sync::Arc;

use crate::dashboard;
use crate::models::DashboardSummary;
use crate::state::AppState;

/// GET /dashboard-summary - 仪表盘概览
pub async fn get_dashboard_summary(State(state): State<Arc<AppState>>) -> Json<DashboardSummary> {
    let summary = dashboard::summarize(&state.store.lock());
    Json(summary)
}
