//! Browser scoreboard — axum HTTP server serving an embedded HTML page
//! plus a small JSON API the page polls.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::ui::SharedGameView;

#[derive(Clone)]
pub struct DashboardState {
    view: SharedGameView,
    started_at: DateTime<Utc>,
}

impl DashboardState {
    pub fn new(view: SharedGameView) -> Self {
        Self {
            view,
            started_at: Utc::now(),
        }
    }
}

/// Spawn the dashboard HTTP server. Returns a handle that can be aborted.
/// A bind failure is logged, not fatal — the monitor keeps running headless.
pub fn spawn_dashboard(view: SharedGameView, bind: &str, port: u16) -> JoinHandle<()> {
    let addr = format!("{bind}:{port}");
    let state = DashboardState::new(view);

    tokio::spawn(async move {
        let app = Router::new()
            .route("/", get(index_handler))
            .route("/api/game", get(game_handler))
            .route("/api/health", get(health_handler))
            .layer(CorsLayer::permissive())
            .with_state(state);

        let listener = match tokio::net::TcpListener::bind(&addr).await {
            Ok(l) => {
                info!(addr = %addr, "Scoreboard server listening");
                l
            }
            Err(e) => {
                warn!(error = %e, addr = %addr, "Failed to bind scoreboard server");
                return;
            }
        };

        if let Err(e) = axum::serve(listener, app).await {
            warn!(error = %e, "Scoreboard server error");
        }
    })
}

async fn index_handler() -> impl IntoResponse {
    let html = include_str!("../../static/index.html");
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html)
}

async fn game_handler(State(state): State<DashboardState>) -> impl IntoResponse {
    let view = state.view.snapshot().await;
    Json(serde_json::to_value(&view).unwrap_or_default())
}

async fn health_handler(State(state): State<DashboardState>) -> impl IntoResponse {
    let view = state.view.snapshot().await;
    Json(serde_json::json!({
        "status": "ok",
        "started_at": state.started_at,
        "updated_at": view.updated_at,
        "game_state": view.game_state,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dashboard_serves_game_state() {
        let view = SharedGameView::new();
        let handle = spawn_dashboard(view, "127.0.0.1", 18780);

        // Give the server time to bind.
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let body = reqwest::get("http://127.0.0.1:18780/api/health")
            .await
            .expect("should connect")
            .text()
            .await
            .expect("should read body");
        assert!(body.contains("\"status\":\"ok\""));

        handle.abort();
    }
}
