//! Repository trait 定義
//!
//! 掲示板の共有状態へのインターフェース。各メソッドは 1 つの論理操作で、
//! 実装は操作全体を 1 回のロック取得の中で行わなければならない。

use async_trait::async_trait;

use super::{
    board::{Audience, ChannelDeparture, ChannelJoin, ChannelSnapshot, Delivery, Departure, Pruned, Registration},
    entity::ChatMessage,
    error::BoardError,
    value_object::{ChannelName, ConnectionId, Handle, MessageId, Timestamp},
};

#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// グローバルチャットに登録
    async fn register(
        &self,
        connection: ConnectionId,
        handle: Handle,
    ) -> Result<Registration, BoardError>;

    /// グローバルチャットと全チャンネルから外れる
    async fn leave(&self, connection: &ConnectionId) -> Departure;

    async fn is_registered(&self, connection: &ConnectionId) -> bool;

    /// 登録中のハンドル（登録順）
    async fn handles(&self) -> Vec<Handle>;

    /// グローバルログに投稿
    async fn post(
        &self,
        connection: &ConnectionId,
        body: String,
        timestamp: Timestamp,
    ) -> Result<Delivery, BoardError>;

    async fn global_message(
        &self,
        requester: &ConnectionId,
        id: MessageId,
    ) -> Result<ChatMessage, BoardError>;

    /// チャンネル名（設定順）
    async fn channel_names(&self) -> Vec<ChannelName>;

    async fn join_channel(
        &self,
        connection: ConnectionId,
        name: &str,
    ) -> Result<ChannelJoin, BoardError>;

    async fn leave_channel(
        &self,
        connection: &ConnectionId,
        name: &str,
    ) -> Result<(Handle, ChannelDeparture), BoardError>;

    async fn post_to_channel(
        &self,
        connection: &ConnectionId,
        name: &str,
        body: String,
        timestamp: Timestamp,
    ) -> Result<Delivery, BoardError>;

    async fn channel_members(
        &self,
        requester: &ConnectionId,
        name: &str,
    ) -> Result<Vec<Handle>, BoardError>;

    async fn channel_message(
        &self,
        requester: &ConnectionId,
        name: &str,
        id: MessageId,
    ) -> Result<ChatMessage, BoardError>;

    async fn channel_snapshot(&self, name: &str) -> Result<ChannelSnapshot, BoardError>;

    async fn channel_snapshots(&self) -> Vec<ChannelSnapshot>;

    /// 到達できなかった接続を通知先の集合から外す
    async fn prune(&self, audience: &Audience, connections: &[ConnectionId]) -> Pruned;
}
