//! UseCase: メッセージ投稿
//!
//! グローバルログまたはチャンネルログに追記し、通知先の全員（投稿者を含む）に配信します。

use std::sync::Arc;

use kairan_shared::time::Clock;

use crate::domain::{Audience, BoardError, BoardRepository, ChatMessage, ConnectionId, Delivery, Notice, Timestamp};

use super::Notifier;

/// メッセージ投稿のユースケース
pub struct PostMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn BoardRepository>,
    /// Notifier（ブロードキャスト）
    notifier: Arc<Notifier>,
    /// 投稿時刻の取得元
    clock: Arc<dyn Clock>,
}

impl PostMessageUseCase {
    /// 新しい PostMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn BoardRepository>,
        notifier: Arc<Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            notifier,
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// グローバルチャットに投稿
    pub async fn post(&self, connection: &ConnectionId, body: String) -> Result<ChatMessage, BoardError> {
        let delivery = self.repository.post(connection, body, self.now()).await?;
        let notice = Notice::Post(&delivery.message).to_string();
        self.deliver(delivery, &notice).await
    }

    /// チャンネルに投稿（投稿者はメンバーでなければならない）
    pub async fn post_to_channel(
        &self,
        connection: &ConnectionId,
        channel: &str,
        body: String,
    ) -> Result<ChatMessage, BoardError> {
        let delivery = self
            .repository
            .post_to_channel(connection, channel, body, self.now())
            .await?;
        let notice = match &delivery.audience {
            Audience::Channel(name) => Notice::ChannelPost {
                channel: name,
                message: &delivery.message,
            }
            .to_string(),
            Audience::Global => Notice::Post(&delivery.message).to_string(),
        };
        self.deliver(delivery, &notice).await
    }

    async fn deliver(&self, delivery: Delivery, notice: &str) -> Result<ChatMessage, BoardError> {
        tracing::debug!(
            "Message {} by '{}' to {:?} ({} recipients)",
            delivery.message.id,
            delivery.message.author,
            delivery.audience,
            delivery.recipients.len()
        );
        self.notifier
            .notify(&delivery.audience, &delivery.recipients, notice)
            .await;
        Ok(delivery.message)
    }
}
