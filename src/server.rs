//! HTTP surface: `/send`, `/ping`, `/time` and `/telegram-latest-update`.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{FromRequest, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::clock;
use crate::config::Config;
use crate::cursor::{UpdateCursor, UpdateReader};
use crate::error::RelayError;
use crate::relay::Relay;
use crate::telegram::TelegramClient;

#[derive(Clone)]
pub struct AppState {
    relay: Arc<Relay>,
    reader: Arc<UpdateReader>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Arc::new(TelegramClient::new(&config.telegram)?);
        Ok(Self {
            relay: Arc::new(Relay::new(client.clone(), config.telegram.chat_id.clone())),
            reader: Arc::new(UpdateReader::new(client, Arc::new(UpdateCursor::new()))),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SendRequest {
    message: Option<String>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/send", post(send))
        .route("/ping", get(ping))
        .route("/time", get(time))
        .route("/telegram-latest-update", get(latest_update))
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &Config, state: AppState) -> Result<()> {
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Server running on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}

/// Accepts JSON or urlencoded bodies; anything unreadable counts as no message.
async fn read_message(request: Request) -> Option<String> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    let body = if is_form {
        Form::<SendRequest>::from_request(request, &()).await.ok()?.0
    } else {
        Json::<SendRequest>::from_request(request, &()).await.ok()?.0
    };
    body.message
}

async fn send(State(state): State<AppState>, request: Request) -> Response {
    let message = read_message(request).await;

    match state.relay.send(message.as_deref()).await {
        Ok(reply) => Json(json!({"success": true, "telegramResponse": reply})).into_response(),
        Err(RelayError::InvalidInput(msg)) => {
            warn!("Rejected /send: {}", msg);
            (StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response()
        }
        Err(e) => {
            error!("Failed to relay message: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"success": false, "error": e.to_string()})),
            )
                .into_response()
        }
    }
}

async fn ping() -> &'static str {
    "pong"
}

async fn time() -> Json<clock::TimeReport> {
    Json(clock::now_in_kolkata())
}

async fn latest_update(State(state): State<AppState>) -> Response {
    match state.reader.poll_latest().await {
        Ok(text) => {
            debug!("Update cursor at {}", state.reader.cursor().current().await);
            Json(json!({"text": text})).into_response()
        }
        Err(e) => {
            error!("Failed to read latest update: {}", e);
            let message = match e {
                RelayError::Upstream(_) => "Failed to fetch updates from Telegram".to_string(),
                other => other.to_string(),
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": message})),
            )
                .into_response()
        }
    }
}
