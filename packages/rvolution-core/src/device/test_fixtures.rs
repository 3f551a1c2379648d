//! Shared test fixtures: canned `command_result` bodies and a fake player.
//!
//! The fake player is a tiny axum server on an ephemeral local port that
//! records every query it receives and answers with a fixed body.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;

use crate::protocol_constants::COMMAND_PATH;

/// Status reply with state and volume only.
pub const STATUS_PLAYING: &str = r#"<command_result><param name="player_state" value="playing"/><param name="playback_volume" value="45"/></command_result>"#;

/// Status reply carrying all four recognized fields.
pub const STATUS_FULL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<command_result>
    <param name="player_state" value="paused"/>
    <param name="playback_volume" value="30"/>
    <param name="playback_mute" value="1"/>
    <param name="product_name" value="R_volution PlayerOne 8K"/>
</command_result>"#;

/// Command reply with no params.
pub const EMPTY_RESULT: &str = "<command_result/>";

/// Command reply rejecting the request.
pub const ERROR_BUSY: &str =
    r#"<command_result><param name="error" value="busy"/></command_result>"#;

/// Status reply that reports an error alongside a state.
pub const ERROR_WITH_STATUS: &str = r#"<command_result>
    <param name="player_state" value="navigator"/>
    <param name="error" value="not_ready"/>
</command_result>"#;

/// How the fake player answers every request.
#[derive(Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(body: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::ok(body)
        }
    }
}

#[derive(Clone)]
struct FakeState {
    reply: Reply,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

/// A running fake player.
pub struct FakePlayer {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl FakePlayer {
    /// Starts a fake player answering every request with `reply`.
    pub async fn start(reply: Reply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            reply,
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route(COMMAND_PATH, get(handle))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake player");
        let addr = listener.local_addr().expect("fake player address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, requests }
    }

    /// Host string to hand to the client.
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    /// Query parameters of every request received so far.
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().clone()
    }
}

async fn handle(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    state.requests.lock().push(params);
    if let Some(delay) = state.reply.delay {
        tokio::time::sleep(delay).await;
    }
    (state.reply.status, state.reply.body.clone())
}

/// A host nothing is listening on.
pub async fn unreachable_host() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    addr.to_string()
}
