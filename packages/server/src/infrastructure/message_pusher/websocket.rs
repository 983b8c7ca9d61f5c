//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender`（送信キュー）を管理
//! - 接続へのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket への書き出しは UI 層（`ui/handler/websocket.rs`）の writer タスクが行います。
//! この実装は送信キューに積むだけなので、送信キューのロックは掲示板のロックとは別で、
//! 相手が遅くても待たされません。writer タスクが終了した接続への送信は失敗し、
//! broadcast は失敗した接続を呼び出し側に返します。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.push_to(&connection, "Available groups: Group1, Group2").await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中の送信キュー
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection);
    }

    async fn unregister_client(&self, connection: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection);
    }

    async fn push_to(
        &self,
        connection: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection)
            .ok_or(MessagePushError::ClientNotFound(*connection))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection);
        Ok(())
    }

    async fn broadcast(&self, targets: &[ConnectionId], content: &str) -> Vec<ConnectionId> {
        let clients = self.clients.lock().await;
        let mut unreachable = Vec::new();

        for target in targets {
            match clients.get(target) {
                Some(sender) => {
                    // ブロードキャストでは一部の送信失敗を許容
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push message to connection '{}': {}", target, e);
                        unreachable.push(*target);
                    } else {
                        tracing::debug!("Broadcasted message to connection '{}'", target);
                    }
                }
                None => {
                    tracing::warn!("Connection '{}' not found during broadcast", target);
                    unreachable.push(*target);
                }
            }
        }

        unreachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信
    // - broadcast: 複数接続への送信と、到達できなかった接続の報告
    //
    // 【どのようなシナリオをテストするか】
    // 1. push_to の成功ケース
    // 2. push_to の失敗ケース（接続が存在しない）
    // 3. broadcast の成功ケース
    // 4. broadcast の部分失敗ケース（writer が終了済み・未登録）
    // ========================================

    fn create_test_pusher() -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
    ) {
        let clients = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(clients.clone());
        (pusher, clients)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にメッセージを送信できる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = ConnectionId::generate();
        pusher.register_client(connection, tx).await;

        // when (操作):
        let result = pusher.push_to(&connection, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let connection = ConnectionId::generate();

        // when (操作):
        let result = pusher.push_to(&connection, "Hello").await;

        // then (期待する結果):
        assert_eq!(result, Err(MessagePushError::ClientNotFound(connection)));
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数の接続にメッセージをブロードキャストできる
        // given (前提条件):
        let (pusher, clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        {
            let mut clients_lock = clients.lock().await;
            clients_lock.insert(alice, tx1);
            clients_lock.insert(bob, tx2);
        }

        // when (操作):
        let unreachable = pusher.broadcast(&[alice, bob], "Broadcast message").await;

        // then (期待する結果):
        assert!(unreachable.is_empty());
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_reports_unreachable_connections() {
        // テスト項目: writer が終了した接続と未登録の接続は到達不能として返り、他には届く
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx_alive, mut rx_alive) = mpsc::unbounded_channel();
        let (tx_dead, rx_dead) = mpsc::unbounded_channel();
        let alive = ConnectionId::generate();
        let dead = ConnectionId::generate();
        let unknown = ConnectionId::generate();
        pusher.register_client(alive, tx_alive).await;
        pusher.register_client(dead, tx_dead).await;
        drop(rx_dead);

        // when (操作):
        let unreachable = pusher.broadcast(&[dead, alive, unknown], "hello").await;

        // then (期待する結果):
        assert_eq!(unreachable, vec![dead, unknown]);
        assert_eq!(rx_alive.recv().await, Some("hello".to_string()));
    }

    #[tokio::test]
    async fn test_unregister_closes_queue() {
        // テスト項目: 登録解除すると送信キューが閉じる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = ConnectionId::generate();
        pusher.register_client(connection, tx).await;

        // when (操作):
        pusher.unregister_client(&connection).await;

        // then (期待する結果):
        assert_eq!(rx.recv().await, None);
    }
}
