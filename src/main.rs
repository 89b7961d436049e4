// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::application::hover::MetricHover;
use crate::application::panel_builder::PanelBuilder;
use crate::application::panel_registry::PanelRegistry;
use crate::infrastructure::config::{load_dashboards_config, load_server_config};
use crate::infrastructure::influx_storage::InfluxPointStorage;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{health_check, list_dashboards, render_dashboard, render_panel};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let server_config = load_server_config().context("Failed to load config/server")?;
    let dashboards_config = load_dashboards_config().context("Failed to load config/dashboards")?;

    // Panels get their identity here, once, before any build
    let registry = Arc::new(PanelRegistry::from_config(dashboards_config)?);

    // Create storage (infrastructure layer)
    let storage = Arc::new(InfluxPointStorage::new(server_config.influx));

    // Create services (application layer)
    let builder = PanelBuilder::new(storage, Arc::new(MetricHover));
    let dashboard_service = DashboardService::new(registry, builder);

    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    // Responses are compressed by json_response, so no CompressionLayer here
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboards", get(list_dashboards))
        .route("/projects/:project/dashboards/:dashboard", get(render_dashboard))
        .route("/projects/:project/panels/:panel", get(render_panel))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = server_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", server_config.server.bind))?;
    tracing::info!("Starting panel-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
