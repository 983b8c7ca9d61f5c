//! MessagePusher trait 定義
//!
//! 接続へのテキスト送信のインターフェース。具体的な実装は Infrastructure 層が提供します。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// 接続の送信キュー（接続ごとの writer タスクが受信側を持つ）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered to the pusher")]
    ClientNotFound(ConnectionId),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// メッセージ送信の抽象化
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信キューを登録
    async fn register_client(&self, connection: ConnectionId, sender: PusherChannel);

    /// 接続の送信キューを登録解除（キューが閉じ、writer タスクが終了する）
    async fn unregister_client(&self, connection: &ConnectionId);

    /// 1 つの接続に送信
    async fn push_to(&self, connection: &ConnectionId, content: &str)
    -> Result<(), MessagePushError>;

    /// 複数の接続に送信
    ///
    /// 一部の送信失敗では中断しない。
    ///
    /// # Returns
    ///
    /// 送信できなかった接続
    async fn broadcast(&self, targets: &[ConnectionId], content: &str) -> Vec<ConnectionId>;
}
