//! # WebSocket Session Handler
//!
//! One `ViewSession` per connected client. The client gets a frame on
//! connect and one after every text message it sends.
//!
//! ```text
//! client ──{"type": ...}──→ session.ingest()
//!                                │
//! client ←──── frame ─────  session.snapshot()
//! ```

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, info};

use crate::command::ViewSession;
use crate::engine::SessionEngine;
use crate::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| {
        let session = ViewSession::new(state.catalog.clone(), state.view_config.clone());
        handle_client(socket, session)
    })
}

/// Per-client receive loop. Ends when the client closes or the socket errors.
async fn handle_client<E: SessionEngine>(socket: WebSocket, mut engine: E) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    info!("Client connected");

    if ws_tx.send(Message::Text(engine.snapshot().into())).await.is_err() {
        info!("Client disconnected before first frame");
        return;
    }

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let changed = engine.ingest(text.as_str());
                debug!(changed, "command applied");
                if ws_tx.send(Message::Text(engine.snapshot().into())).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {} // Binary and ping/pong carry no commands
        }
    }

    info!("Client disconnected");
}
