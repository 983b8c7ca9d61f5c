//! InMemory Board Repository 実装
//!
//! ドメイン層が定義する BoardRepository trait の具体的な実装。
//! Board 集約全体を 1 つの `tokio::sync::Mutex` で守り、各メソッドはロックを
//! 1 回だけ取得して 1 つの論理操作を完結させます。送信は行いません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Audience, Board, BoardError, BoardRepository, ChannelDeparture, ChannelJoin, ChannelName,
    ChannelSnapshot, ChatMessage, ConnectionId, Delivery, Departure, Handle, MessageId,
    Pruned, Registration, Timestamp,
};

/// インメモリ Board Repository 実装
pub struct InMemoryBoardRepository {
    /// 掲示板の共有状態（唯一の調停ロック）
    board: Arc<Mutex<Board>>,
}

impl InMemoryBoardRepository {
    /// 新しい InMemoryBoardRepository を作成
    pub fn new(board: Arc<Mutex<Board>>) -> Self {
        Self { board }
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn register(
        &self,
        connection: ConnectionId,
        handle: Handle,
    ) -> Result<Registration, BoardError> {
        let mut board = self.board.lock().await;
        board.register(connection, handle)
    }

    async fn leave(&self, connection: &ConnectionId) -> Departure {
        let mut board = self.board.lock().await;
        board.leave(connection)
    }

    async fn is_registered(&self, connection: &ConnectionId) -> bool {
        let board = self.board.lock().await;
        board.is_registered(connection)
    }

    async fn handles(&self) -> Vec<Handle> {
        let board = self.board.lock().await;
        board.handles()
    }

    async fn post(
        &self,
        connection: &ConnectionId,
        body: String,
        timestamp: Timestamp,
    ) -> Result<Delivery, BoardError> {
        let mut board = self.board.lock().await;
        board.post(connection, body, timestamp)
    }

    async fn global_message(
        &self,
        requester: &ConnectionId,
        id: MessageId,
    ) -> Result<ChatMessage, BoardError> {
        let board = self.board.lock().await;
        board.global_message(requester, id)
    }

    async fn channel_names(&self) -> Vec<ChannelName> {
        let board = self.board.lock().await;
        board.channel_names()
    }

    async fn join_channel(
        &self,
        connection: ConnectionId,
        name: &str,
    ) -> Result<ChannelJoin, BoardError> {
        let mut board = self.board.lock().await;
        board.join_channel(connection, name)
    }

    async fn leave_channel(
        &self,
        connection: &ConnectionId,
        name: &str,
    ) -> Result<(Handle, ChannelDeparture), BoardError> {
        let mut board = self.board.lock().await;
        board.leave_channel(connection, name)
    }

    async fn post_to_channel(
        &self,
        connection: &ConnectionId,
        name: &str,
        body: String,
        timestamp: Timestamp,
    ) -> Result<Delivery, BoardError> {
        let mut board = self.board.lock().await;
        board.post_to_channel(connection, name, body, timestamp)
    }

    async fn channel_members(
        &self,
        requester: &ConnectionId,
        name: &str,
    ) -> Result<Vec<Handle>, BoardError> {
        let board = self.board.lock().await;
        board.channel_members(requester, name)
    }

    async fn channel_message(
        &self,
        requester: &ConnectionId,
        name: &str,
        id: MessageId,
    ) -> Result<ChatMessage, BoardError> {
        let board = self.board.lock().await;
        board.channel_message(requester, name, id)
    }

    async fn channel_snapshot(&self, name: &str) -> Result<ChannelSnapshot, BoardError> {
        let board = self.board.lock().await;
        board.channel_snapshot(name)
    }

    async fn channel_snapshots(&self) -> Vec<ChannelSnapshot> {
        let board = self.board.lock().await;
        board.channel_snapshots()
    }

    async fn prune(&self, audience: &Audience, connections: &[ConnectionId]) -> Pruned {
        let mut board = self.board.lock().await;
        board.prune(audience, connections)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::BoardConfig;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 複数タスクから同時に操作しても Board の不変条件が保たれること
    //
    // 【なぜこのテストが必要か】
    // - 接続ごとのタスクが並行して Repository を呼ぶ
    // - ハンドルの一意性と ID の連番はロックで直列化されて初めて成り立つ
    // ========================================

    fn create_test_repository() -> Arc<InMemoryBoardRepository> {
        let board = Arc::new(Mutex::new(Board::new(&BoardConfig::default())));
        Arc::new(InMemoryBoardRepository::new(board))
    }

    fn handle(value: &str) -> Handle {
        Handle::new(value.to_string()).unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_registration_with_same_handle() {
        // テスト項目: 同じハンドルで同時に登録すると、成功するのはちょうど 1 つ
        // given (前提条件):
        let repository = create_test_repository();

        // when (操作):
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let repository = repository.clone();
            tasks.push(tokio::spawn(async move {
                repository
                    .register(ConnectionId::generate(), handle("alice"))
                    .await
            }));
        }
        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap());
        }

        // then (期待する結果):
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(succeeded, 1);
        assert!(
            results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|e| e == &BoardError::HandleTaken("alice".to_string()))
        );
        assert_eq!(repository.handles().await, vec![handle("alice")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_posts_get_gapless_ids() {
        // テスト項目: N 件の同時投稿の後、ログには 1..=N の ID が欠番・重複なく並ぶ
        // given (前提条件):
        let repository = create_test_repository();
        let mut connections = Vec::new();
        for i in 0..8 {
            let connection = ConnectionId::generate();
            repository
                .register(connection, handle(&format!("user{i}")))
                .await
                .unwrap();
            connections.push(connection);
        }

        // when (操作):
        let per_client = 25;
        let mut tasks = Vec::new();
        for connection in connections.clone() {
            let repository = repository.clone();
            tasks.push(tokio::spawn(async move {
                let mut ids = Vec::new();
                for n in 0..per_client {
                    let delivery = repository
                        .post(&connection, format!("message {n}"), Timestamp::new(0))
                        .await
                        .unwrap();
                    ids.push(delivery.message.id.value());
                }
                ids
            }));
        }
        let mut ids = HashSet::new();
        for task in tasks {
            for id in task.await.unwrap() {
                assert!(ids.insert(id), "duplicate id {id}");
            }
        }

        // then (期待する結果):
        let total = (connections.len() * per_client) as u64;
        assert_eq!(ids, (1..=total).collect::<HashSet<u64>>());
        let last = MessageId::new(total).unwrap();
        assert!(repository.global_message(&connections[0], last).await.is_ok());
    }

    #[tokio::test]
    async fn test_leave_clears_channel_memberships() {
        // テスト項目: leave の後、どのチャンネルにも接続が残らない
        // given (前提条件):
        let repository = create_test_repository();
        let alice = ConnectionId::generate();
        repository.register(alice, handle("alice")).await.unwrap();
        repository.join_channel(alice, "Group1").await.unwrap();
        repository.join_channel(alice, "Group2").await.unwrap();

        // when (操作):
        let departure = repository.leave(&alice).await;

        // then (期待する結果):
        assert_eq!(departure.channels.len(), 2);
        assert!(!repository.is_registered(&alice).await);
        for snapshot in repository.channel_snapshots().await {
            assert!(snapshot.members.is_empty());
        }
    }
}
