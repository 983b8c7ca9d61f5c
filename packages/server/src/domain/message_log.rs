//! Message Log
//!
//! 追記専用のメッセージ列。ID は 1 から連番で払い出され、保持上限を超えて
//! 古いエントリが捨てられても番号は振り直さない。

use std::collections::VecDeque;

use super::{
    entity::ChatMessage,
    error::BoardError,
    value_object::{Handle, MessageId, Timestamp},
};

#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<ChatMessage>,
    /// 直近に払い出した ID（未使用なら None）
    last_id: Option<MessageId>,
    /// 保持上限（None なら無制限）
    capacity: Option<usize>,
}

impl MessageLog {
    /// 無制限のログを作成
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    /// 保持件数の上限を指定してログを作成（`None` なら無制限）
    ///
    /// 上限 0 は設定の段階で拒否される（`ConfigError::ZeroCapacity`）。
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            last_id: None,
            capacity,
        }
    }

    /// メッセージを追記し、払い出したエントリを返す
    pub fn append(&mut self, author: Handle, body: String, timestamp: Timestamp) -> ChatMessage {
        let id = self.last_id.map_or(MessageId::FIRST, MessageId::next);
        self.last_id = Some(id);

        let message = ChatMessage {
            id,
            author,
            timestamp,
            body,
        };
        self.entries.push_back(message.clone());

        if let Some(capacity) = self.capacity {
            while self.entries.len() > capacity {
                self.entries.pop_front();
            }
        }

        message
    }

    /// ID でメッセージを取得
    ///
    /// まだ払い出していない ID と、上限超過で捨てられた ID は `NotFound`。
    pub fn get(&self, id: MessageId) -> Result<&ChatMessage, BoardError> {
        let not_found = || BoardError::NotFound(id.value());

        let oldest = self.entries.front().ok_or_else(not_found)?.id;
        if id < oldest {
            return Err(not_found());
        }
        // 保持中のエントリは ID が連続している
        let offset = usize::try_from(id.value() - oldest.value()).map_err(|_| not_found())?;
        self.entries.get(offset).ok_or_else(not_found)
    }

    /// 直近 `n` 件を古い順に返す
    pub fn tail(&self, n: usize) -> Vec<ChatMessage> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter()
    }

    /// 保持中のエントリ数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::unbounded()
    }
}
