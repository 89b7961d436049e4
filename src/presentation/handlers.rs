// HTTP request handlers
use crate::application::dashboard_service::ServiceError;
use crate::domain::error::PanelError;
use crate::domain::telemetry::{ProjectId, TimeWindow};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List configured dashboards
pub async fn list_dashboards(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let summaries = state.dashboard_service.list();
    respond(StatusCode::OK, &summaries, accepts_brotli(&headers)).await
}

/// Build every panel of a dashboard for a project
pub async fn render_dashboard(
    Path((project, dashboard_id)): Path<(String, String)>,
    Query(window): Query<TimeWindow>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let project = ProjectId::new(project);

    match state
        .dashboard_service
        .render(&project, &dashboard_id, &window)
        .await
    {
        Ok(rendered) => respond(StatusCode::OK, &rendered, compress).await,
        Err(e) => error_response(e, compress).await,
    }
}

/// Build a single panel for a project
pub async fn render_panel(
    Path((project, panel_id)): Path<(String, String)>,
    Query(window): Query<TimeWindow>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let compress = accepts_brotli(&headers);
    let project = ProjectId::new(project);

    match state
        .dashboard_service
        .render_panel(&project, &panel_id, &window)
        .await
    {
        Ok(payload) => respond(StatusCode::OK, &payload, compress).await,
        Err(e) => error_response(e, compress).await,
    }
}

fn status_for(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::DashboardNotFound(_) | ServiceError::PanelNotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Panel(PanelError::Configuration(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Panel(PanelError::UpstreamQuery(_)) => StatusCode::BAD_GATEWAY,
    }
}

async fn error_response(error: ServiceError, compress: bool) -> axum::response::Response {
    let status = status_for(&error);
    if status.is_server_error() {
        tracing::error!("Request failed: {}", error);
    }
    let body = ErrorBody {
        error: error.to_string(),
    };
    respond(status, &body, compress).await
}

async fn respond<T: Serialize>(
    status: StatusCode,
    data: &T,
    compress: bool,
) -> axum::response::Response {
    match json_response(status, data, compress).await {
        Ok(response) => response.into_response(),
        Err(status) => status.into_response(),
    }
}
