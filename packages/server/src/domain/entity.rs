//! Entities
//!
//! 掲示板に登録されたクライアントと、ログに残るメッセージ。

use std::fmt;

use super::value_object::{ConnectionId, Handle, MessageId, Timestamp};

/// 登録済みクライアント
///
/// 接続がグローバルチャットに登録されている間だけ存在する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub connection: ConnectionId,
    pub handle: Handle,
}

impl Client {
    pub fn new(connection: ConnectionId, handle: Handle) -> Self {
        Self { connection, handle }
    }
}

/// メッセージログの 1 エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub author: Handle,
    pub timestamp: Timestamp,
    pub body: String,
}

/// `<id>, <author>, <timestamp>, <body>`
impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.id, self.author, self.timestamp, self.body
        )
    }
}
