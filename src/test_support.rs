//! In-process stand-in for the Telegram Bot API used by the tests.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::TelegramConfig;

#[derive(Clone)]
pub struct FakeTelegram {
    /// Every `offset` received by `getUpdates`, in call order.
    pub offsets: Arc<Mutex<Vec<i64>>>,
    /// Every JSON body received by `sendMessage`.
    pub sent: Arc<Mutex<Vec<Value>>>,
    updates_reply: Arc<Mutex<Value>>,
    send_reply: Arc<Mutex<Value>>,
    /// When set, both methods answer with this status and non-JSON body.
    raw_reply: Arc<Mutex<Option<(StatusCode, String)>>>,
    /// When set, `getUpdates` sleeps this long before answering.
    updates_delay: Arc<Mutex<Option<Duration>>>,
}

impl FakeTelegram {
    pub fn new() -> Self {
        Self {
            offsets: Arc::new(Mutex::new(Vec::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            updates_reply: Arc::new(Mutex::new(json!({"ok": true, "result": []}))),
            send_reply: Arc::new(Mutex::new(
                json!({"ok": true, "result": {"message_id": 1}}),
            )),
            raw_reply: Arc::new(Mutex::new(None)),
            updates_delay: Arc::new(Mutex::new(None)),
        }
    }

    pub fn reply_raw(&self, status: StatusCode, body: &str) {
        *self.raw_reply.lock().unwrap() = Some((status, body.to_string()));
    }

    pub fn stall_updates(&self, delay: Option<Duration>) {
        *self.updates_delay.lock().unwrap() = delay;
    }

    pub fn reply_updates(&self, body: Value) {
        *self.updates_reply.lock().unwrap() = body;
    }

    pub fn reply_send(&self, body: Value) {
        *self.send_reply.lock().unwrap() = body;
    }

    pub fn offsets(&self) -> Vec<i64> {
        self.offsets.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }

    /// Serve on an ephemeral port and return a config pointing at it.
    pub async fn start(&self) -> TelegramConfig {
        let app = Router::new()
            .route("/{bot}/getUpdates", get(get_updates))
            .route("/{bot}/sendMessage", post(send_message))
            .with_state(self.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        config_for(&format!("http://{addr}"))
    }
}

/// A config whose API base URL refuses connections.
pub async fn unreachable_config() -> TelegramConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    config_for(&format!("http://{addr}"))
}

fn config_for(base_url: &str) -> TelegramConfig {
    TelegramConfig {
        bot_token: "123:test".to_string(),
        chat_id: "777".to_string(),
        api_base_url: base_url.to_string(),
        request_timeout_secs: Some(5),
        poll_timeout_secs: 5,
    }
}

fn raw(fake: &FakeTelegram) -> Option<Response> {
    let raw = fake.raw_reply.lock().unwrap().clone();
    raw.map(|(status, body)| (status, [("content-type", "text/html")], body).into_response())
}

async fn get_updates(
    State(fake): State<FakeTelegram>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(offset) = params.get("offset").and_then(|o| o.parse().ok()) {
        fake.offsets.lock().unwrap().push(offset);
    }
    let delay = *fake.updates_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(resp) = raw(&fake) {
        return resp;
    }
    let reply = fake.updates_reply.lock().unwrap().clone();
    Json(reply).into_response()
}

async fn send_message(State(fake): State<FakeTelegram>, Json(body): Json<Value>) -> Response {
    fake.sent.lock().unwrap().push(body);
    if let Some(resp) = raw(&fake) {
        return resp;
    }
    let reply = fake.send_reply.lock().unwrap().clone();
    Json(reply).into_response()
}
