// crates/server/src/routes/stream.rs
//! Live job event stream.
//!
//! - GET /jobs/ws — WebSocket upgrade; every published `JobEvent` is
//!   delivered as one JSON text frame
//!
//! A new connection receives only events published after it subscribes;
//! clients call `GET /jobs` first to hydrate. Closing the socket (or any
//! send failure) unsubscribes the observer.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::{SinkExt, StreamExt};

use crate::state::AppState;

pub async fn jobs_ws(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let subscription = state.hub.subscribe();
    let observer_id = subscription.id;
    let mut rx = subscription.rx;
    tracing::info!(observer_id = %observer_id, "observer connected");

    let (mut sink, mut stream) = socket.split();

    // Forward hub events to the socket; each event is one text frame.
    let forward_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let frame = serde_json::to_string(&event).unwrap_or_default();
            if sink.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Observers only listen; drain the read side to notice the close.
    while let Some(Ok(msg)) = stream.next().await {
        match msg {
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Cleanup
    state.hub.unsubscribe(observer_id);
    forward_task.abort();
    tracing::info!(observer_id = %observer_id, "observer disconnected");
}

/// Build the stream router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/jobs/ws", get(jobs_ws))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn router_creation() {
        let _router = router();
    }
}
