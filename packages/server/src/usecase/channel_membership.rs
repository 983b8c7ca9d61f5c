//! UseCase: チャンネルへの参加・退出

use std::sync::Arc;

use crate::domain::{
    Audience, BoardError, BoardRepository, ChannelJoin, ChannelName, ConnectionId, Notice,
};

use super::Notifier;

/// チャンネル参加・退出のユースケース
pub struct ChannelMembershipUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn BoardRepository>,
    /// Notifier（ブロードキャスト）
    notifier: Arc<Notifier>,
}

impl ChannelMembershipUseCase {
    /// 新しい ChannelMembershipUseCase を作成
    pub fn new(repository: Arc<dyn BoardRepository>, notifier: Arc<Notifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// チャンネルに参加
    ///
    /// 参加通知はチャンネルのメンバー全員（本人を含む）に送る。
    /// 直近の履歴は戻り値として返し、本人への返信は呼び出し側が行う。
    pub async fn join(&self, connection: ConnectionId, channel: &str) -> Result<ChannelJoin, BoardError> {
        let join = self.repository.join_channel(connection, channel).await?;
        tracing::info!("'{}' joined {}", join.handle, join.channel);

        let notice = Notice::JoinedChannel {
            handle: &join.handle,
            channel: &join.channel,
        }
        .to_string();
        self.notifier
            .notify(&Audience::Channel(join.channel.clone()), &join.recipients, &notice)
            .await;

        Ok(join)
    }

    /// チャンネルから退出
    ///
    /// 退出通知は残りのメンバーに送る。
    pub async fn leave(&self, connection: &ConnectionId, channel: &str) -> Result<ChannelName, BoardError> {
        let (handle, departure) = self.repository.leave_channel(connection, channel).await?;
        tracing::info!("'{}' left {}", handle, departure.channel);

        let notice = Notice::LeftChannel {
            handle: &handle,
            channel: &departure.channel,
        }
        .to_string();
        self.notifier
            .notify(
                &Audience::Channel(departure.channel.clone()),
                &departure.remaining,
                &notice,
            )
            .await;

        Ok(departure.channel)
    }
}
