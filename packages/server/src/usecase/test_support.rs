//! Shared fixtures for use case tests.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, mpsc};

use crate::{
    config::BoardConfig,
    domain::{Board, BoardRepository, ConnectionId, Handle, MessagePusher},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryBoardRepository},
};

use super::Notifier;

pub(crate) struct Harness {
    pub repository: Arc<InMemoryBoardRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub notifier: Arc<Notifier>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(BoardConfig::default())
    }

    pub fn with_config(config: BoardConfig) -> Self {
        let board = Arc::new(Mutex::new(Board::new(&config)));
        let repository = Arc::new(InMemoryBoardRepository::new(board));
        let pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let notifier = Arc::new(Notifier::new(repository.clone(), pusher.clone()));
        Self {
            repository,
            pusher,
            notifier,
        }
    }

    /// Opens a connection whose queue can be read through the returned receiver
    pub async fn open(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.pusher.register_client(connection, tx).await;
        (connection, rx)
    }

    /// Opens a connection and registers it directly on the board (no notices)
    pub async fn registered(&self, name: &str) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (connection, rx) = self.open().await;
        self.repository
            .register(connection, handle(name))
            .await
            .unwrap();
        (connection, rx)
    }
}

pub(crate) fn handle(value: &str) -> Handle {
    Handle::new(value.to_string()).unwrap()
}

/// Everything queued so far
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Ok(line) = rx.try_recv() {
        lines.push(line);
    }
    lines
}
