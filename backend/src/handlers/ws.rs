//! WebSocket endpoint for live alert delivery
//!
//! Send-only stream: each connected client gets every alert published after
//! it connected, as the same JSON envelope the broadcaster serializes. A
//! client that falls too far behind skips the overwritten messages and keeps
//! receiving from the current position.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use tokio::sync::broadcast;

use crate::AppState;

/// Upgrade to a WebSocket that streams alert events
pub async fn alerts_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let rx = state.alerts.subscribe();
    ws.on_upgrade(move |socket| stream_alerts(socket, rx))
}

async fn stream_alerts(mut socket: WebSocket, mut rx: broadcast::Receiver<String>) {
    loop {
        match rx.recv().await {
            Ok(payload) => {
                if socket.send(Message::Text(payload)).await.is_err() {
                    // Client went away.
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "slow websocket client skipped alert events");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
