//! UseCase: グローバルチャットへの登録
//!
//! 登録に成功すると、登録済みの全員（本人を含む）に参加通知を送ります。
//! チャンネル一覧の案内は呼び出し側（Dispatcher）が本人への返信として送ります。

use std::sync::Arc;

use crate::domain::{
    Audience, BoardError, BoardRepository, ConnectionId, Handle, Notice, Registration,
};

use super::Notifier;

/// グローバルチャット登録のユースケース
pub struct RegisterClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn BoardRepository>,
    /// Notifier（ブロードキャスト）
    notifier: Arc<Notifier>,
}

impl RegisterClientUseCase {
    /// 新しい RegisterClientUseCase を作成
    pub fn new(repository: Arc<dyn BoardRepository>, notifier: Arc<Notifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// 登録を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Registration)` - 登録成功
    /// * `Err(BoardError::HandleTaken)` - ハンドルが使用中（接続は未登録のまま）
    /// * `Err(BoardError::AlreadyRegistered)` - 接続がすでに登録済み
    pub async fn execute(
        &self,
        connection: ConnectionId,
        handle: Handle,
    ) -> Result<Registration, BoardError> {
        let registration = self.repository.register(connection, handle).await?;
        tracing::info!(
            "'{}' joined the chat ({} registered)",
            registration.handle,
            registration.recipients.len()
        );

        let notice = Notice::JoinedChat(&registration.handle).to_string();
        self.notifier
            .notify(&Audience::Global, &registration.recipients, &notice)
            .await;

        Ok(registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Harness, drain, handle};

    #[tokio::test]
    async fn test_register_notifies_all_registered_clients() {
        // テスト項目: 登録すると本人を含む登録済み全員に参加通知が届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = RegisterClientUseCase::new(harness.repository.clone(), harness.notifier.clone());
        let (_alice, mut alice_rx) = harness.registered("alice").await;
        let (bob, mut bob_rx) = harness.open().await;

        // when (操作):
        let registration = usecase.execute(bob, handle("bob")).await.unwrap();

        // then (期待する結果):
        assert_eq!(registration.channels.len(), 5);
        assert_eq!(drain(&mut alice_rx), vec!["bob has joined the chat."]);
        assert_eq!(drain(&mut bob_rx), vec!["bob has joined the chat."]);
    }

    #[tokio::test]
    async fn test_register_with_taken_handle() {
        // テスト項目: 使用中のハンドルでは登録できず、誰にも通知されない
        // given (前提条件):
        let harness = Harness::new();
        let usecase = RegisterClientUseCase::new(harness.repository.clone(), harness.notifier.clone());
        let (_alice, mut alice_rx) = harness.registered("alice").await;
        let (imposter, mut imposter_rx) = harness.open().await;

        // when (操作):
        let result = usecase.execute(imposter, handle("alice")).await;

        // then (期待する結果):
        assert_eq!(result, Err(BoardError::HandleTaken("alice".to_string())));
        assert!(drain(&mut alice_rx).is_empty());
        assert!(drain(&mut imposter_rx).is_empty());
        assert!(!harness.repository.is_registered(&imposter).await);
    }
}
