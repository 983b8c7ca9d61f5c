//! UseCase: グローバルチャットからの退出
//!
//! `leave` / `exit` コマンドと切断時の後始末で使います。全チャンネルから外れ、
//! 各チャンネルの残りのメンバーとグローバルチャットの残りのクライアントに通知します。

use std::sync::Arc;

use crate::domain::{Audience, BoardError, BoardRepository, ConnectionId, Handle, Notice};

use super::Notifier;

/// グローバルチャット退出のユースケース
pub struct LeaveChatUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn BoardRepository>,
    /// Notifier（ブロードキャスト）
    notifier: Arc<Notifier>,
}

impl LeaveChatUseCase {
    /// 新しい LeaveChatUseCase を作成
    pub fn new(repository: Arc<dyn BoardRepository>, notifier: Arc<Notifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// 退出を実行
    ///
    /// # Arguments
    ///
    /// * `connection` - 退出する接続
    /// * `handle` - 接続のハンドル（グローバルチャットから先に外されていた場合の通知に使う）
    ///
    /// # Returns
    ///
    /// * `Ok(())` - グローバルチャットから退出した
    /// * `Err(BoardError::NotRegistered)` - グローバルチャットには登録されていなかった
    ///   （チャンネルからは外れている）
    pub async fn execute(&self, connection: &ConnectionId, handle: &Handle) -> Result<(), BoardError> {
        let departure = self.repository.leave(connection).await;
        let departed = departure.handle.as_ref().unwrap_or(handle);

        for channel in &departure.channels {
            tracing::info!("'{}' left {}", departed, channel.channel);
            let notice = Notice::LeftChannel {
                handle: departed,
                channel: &channel.channel,
            }
            .to_string();
            self.notifier
                .notify(
                    &Audience::Channel(channel.channel.clone()),
                    &channel.remaining,
                    &notice,
                )
                .await;
        }

        let Some(registered) = departure.handle.as_ref() else {
            return Err(BoardError::NotRegistered);
        };
        tracing::info!(
            "'{}' left the chat ({} remaining)",
            registered,
            departure.remaining_clients.len()
        );
        let notice = Notice::LeftChat(registered).to_string();
        self.notifier
            .notify(&Audience::Global, &departure.remaining_clients, &notice)
            .await;

        Ok(())
    }
}
