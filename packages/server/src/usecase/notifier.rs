//! Broadcast Engine
//!
//! 通知先のスナップショットに送信し、届かなかった接続を通知先の集合から外します。
//! 呼び出し時点で掲示板のロックは保持していません。外すときだけ Repository 経由で
//! 短くロックを取り直します。

use std::{collections::VecDeque, sync::Arc};

use crate::domain::{
    Audience, BoardRepository, ConnectionId, MessagePushError, MessagePusher, Notice,
};

pub struct Notifier {
    repository: Arc<dyn BoardRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl Notifier {
    pub fn new(repository: Arc<dyn BoardRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// `members` 全員に `text` を送る
    ///
    /// 送信に失敗した接続は `audience` から外し、残りのメンバーに退出通知を送る。
    /// 退出通知でさらに失敗した接続も同じように扱う。エラーは呼び出し側に返さない。
    ///
    /// # Returns
    ///
    /// 外した接続の数
    pub async fn notify(&self, audience: &Audience, members: &[ConnectionId], text: &str) -> usize {
        let mut pending = VecDeque::from([(members.to_vec(), text.to_string())]);
        let mut pruned_total = 0;

        while let Some((targets, text)) = pending.pop_front() {
            let unreachable = self.message_pusher.broadcast(&targets, &text).await;
            if unreachable.is_empty() {
                continue;
            }

            let pruned = self.repository.prune(audience, &unreachable).await;
            for connection in &pruned.removed {
                tracing::warn!(
                    "Pruned unreachable connection '{}' from {:?}",
                    connection,
                    audience
                );
            }
            pruned_total += pruned.removed.len();

            for handle in &pruned.handles {
                let notice = match audience {
                    Audience::Global => Notice::LeftChat(handle),
                    Audience::Channel(channel) => Notice::LeftChannel { handle, channel },
                };
                pending.push_back((pruned.remaining.clone(), notice.to_string()));
            }
        }
        pruned_total
    }

    /// 1 つの接続に直接送る（コマンドへの返信）
    pub async fn reply(&self, connection: &ConnectionId, text: &str) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(connection, text).await
    }
}
