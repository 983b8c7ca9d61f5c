//! Client Registry
//!
//! 接続 ID とハンドルの対応表。同時に登録されている 2 つのクライアントが
//! 同じハンドルを持つことはない。

use super::{
    entity::Client,
    error::BoardError,
    value_object::{ConnectionId, Handle},
};

/// 登録順を保持するクライアント一覧
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    clients: Vec<Client>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// クライアントを登録
    ///
    /// # Errors
    ///
    /// * `AlreadyRegistered` - 接続がすでに登録済み
    /// * `HandleTaken` - ハンドルが別の接続に使われている
    pub fn register(&mut self, connection: ConnectionId, handle: Handle) -> Result<(), BoardError> {
        if self.contains(&connection) {
            return Err(BoardError::AlreadyRegistered);
        }
        if self.clients.iter().any(|c| c.handle == handle) {
            return Err(BoardError::HandleTaken(handle.into_string()));
        }

        self.clients.push(Client::new(connection, handle));
        Ok(())
    }

    /// クライアントの登録を解除し、解除したクライアントを返す
    pub fn unregister(&mut self, connection: &ConnectionId) -> Result<Client, BoardError> {
        let position = self
            .clients
            .iter()
            .position(|c| &c.connection == connection)
            .ok_or(BoardError::NotRegistered)?;
        Ok(self.clients.remove(position))
    }

    pub fn contains(&self, connection: &ConnectionId) -> bool {
        self.clients.iter().any(|c| &c.connection == connection)
    }

    pub fn handle_of(&self, connection: &ConnectionId) -> Option<&Handle> {
        self.clients
            .iter()
            .find(|c| &c.connection == connection)
            .map(|c| &c.handle)
    }

    /// 登録中のハンドル（登録順）
    pub fn handles(&self) -> Vec<Handle> {
        self.clients.iter().map(|c| c.handle.clone()).collect()
    }

    /// 登録中の接続 ID（登録順）
    pub fn connections(&self) -> Vec<ConnectionId> {
        self.clients.iter().map(|c| c.connection).collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
