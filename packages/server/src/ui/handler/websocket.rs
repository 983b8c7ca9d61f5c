//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    ui::{
        session::{Flow, Session},
        state::AppState,
    },
};

/// 接続直後に送る案内
pub const WELCOME: &str = "Welcome! Enter a unique handle.";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that writes every queued line to the WebSocket as one text frame.
///
/// The task ends when the queue is closed (the connection was unregistered from the
/// pusher) or when a write fails, and closes the sink on the way out.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if sender.send(Message::Text(line.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection = ConnectionId::generate();
    let (sender, mut receiver) = socket.split();

    // Replies and notifications for this connection all go through one queue
    let (tx, rx) = mpsc::unbounded_channel();
    state.message_pusher.register_client(connection, tx).await;
    tracing::info!("Connection '{}' opened", connection);

    let mut send_task = pusher_loop(rx, sender);
    let mut session = Session::new(connection, state.clone());
    if let Err(e) = state.notifier.reply(&connection, WELCOME).await {
        tracing::warn!("Failed to greet '{}': {}", connection, e);
    }

    let read_loop = async {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    for line in text.as_str().lines() {
                        if session.handle_line(line).await == Flow::Close {
                            return;
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Connection '{}' requested close", connection);
                    return;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Read error on '{}': {}", connection, e);
                    return;
                }
            }
        }
    };

    let mut send_finished = false;
    tokio::select! {
        _ = read_loop => {}
        _ = &mut send_task => send_finished = true,
    }

    // Cleanup runs exactly once, whichever side ended first
    session.close().await;
    if !send_finished {
        let _ = send_task.await;
    }
}
