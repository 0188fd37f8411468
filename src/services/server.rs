use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

use crate::core::errors::Result;
use crate::services::bridge::{ApiError, Bridge, Request};

pub fn router(bridge: Arc<Bridge>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/invoke", post(invoke))
        .with_state(bridge)
}

async fn invoke(State(bridge): State<Arc<Bridge>>, Json(request): Json<Request>) -> Response {
    let command = request.name();
    match bridge.invoke(request).await {
        Ok(value) => Json::<Value>(value).into_response(),
        Err(e) => {
            tracing::warn!(command, "bridge call failed: {}", e);
            let body = ApiError::from(&e);
            let status =
                StatusCode::from_u16(body.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(body)).into_response()
        }
    }
}

/// Serves the bridge until ctrl-c.
pub async fn serve(bridge: Arc<Bridge>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("bridge listening on {}", listener.local_addr()?);
    axum::serve(listener, router(bridge))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
