//! UseCase: 掲示板の参照系操作
//!
//! 状態を変更しない問い合わせ。ID の解釈（`InvalidId`）はログを引く前に行います。

use std::sync::Arc;

use crate::domain::{
    BoardError, BoardRepository, ChannelName, ChannelSnapshot, ChatMessage, ConnectionId, Handle,
    MessageId,
};

/// 参照系のユースケース
pub struct BoardQueryUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn BoardRepository>,
}

impl BoardQueryUseCase {
    /// 新しい BoardQueryUseCase を作成
    pub fn new(repository: Arc<dyn BoardRepository>) -> Self {
        Self { repository }
    }

    /// 登録中のハンドル（登録順）
    pub async fn users(&self) -> Vec<Handle> {
        self.repository.handles().await
    }

    /// チャンネル名（設定順）
    pub async fn groups(&self) -> Vec<ChannelName> {
        self.repository.channel_names().await
    }

    /// チャンネルのメンバーのハンドル
    pub async fn group_users(
        &self,
        requester: &ConnectionId,
        channel: &str,
    ) -> Result<Vec<Handle>, BoardError> {
        self.repository.channel_members(requester, channel).await
    }

    /// グローバルログからメッセージを取得
    pub async fn retrieve_message(
        &self,
        requester: &ConnectionId,
        raw_id: &str,
    ) -> Result<ChatMessage, BoardError> {
        let id = MessageId::parse(raw_id)?;
        self.repository.global_message(requester, id).await
    }

    /// チャンネルログからメッセージを取得（要求者はメンバーでなければならない）
    pub async fn group_message(
        &self,
        requester: &ConnectionId,
        channel: &str,
        raw_id: &str,
    ) -> Result<ChatMessage, BoardError> {
        let id = MessageId::parse(raw_id)?;
        self.repository.channel_message(requester, channel, id).await
    }

    pub async fn channel_snapshot(&self, channel: &str) -> Result<ChannelSnapshot, BoardError> {
        self.repository.channel_snapshot(channel).await
    }

    pub async fn channel_snapshots(&self) -> Vec<ChannelSnapshot> {
        self.repository.channel_snapshots().await
    }
}
