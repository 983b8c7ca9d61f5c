//! Value Objects
//!
//! 掲示板で扱う値を型で区別するための Value Object 群。

use std::fmt;

use kairan_shared::time::format_board_timestamp;
use serde::Serialize;
use uuid::Uuid;

use super::error::BoardError;

fn is_token(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(char::is_whitespace)
}

/// 接続の識別子
///
/// トランスポート層が接続ごとに払い出す不透明な ID。接続が生きている間は変わらない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// 新しい ConnectionId を生成（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// クライアントが登録時に選ぶ表示名（大文字小文字を区別する）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    pub fn new(value: String) -> Result<Self, BoardError> {
        if is_token(&value) {
            Ok(Self(value))
        } else {
            Err(BoardError::InvalidHandle)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// サブチャンネル（グループ）の名前
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn new(value: String) -> Result<Self, BoardError> {
        if is_token(&value) {
            Ok(Self(value))
        } else {
            Err(BoardError::InvalidChannelName(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージログ内の通し番号（1 始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub const FIRST: MessageId = MessageId(1);

    /// 1 以上の ID を作成
    pub fn new(value: u64) -> Option<Self> {
        (value >= 1).then_some(Self(value))
    }

    /// コマンド引数から ID を解釈する
    ///
    /// 数値でないもの、0、負数、u64 に収まらないものは `InvalidId`。
    pub fn parse(raw: &str) -> Result<Self, BoardError> {
        raw.parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| BoardError::InvalidId(raw.to_string()))
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_board_timestamp(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_rejects_empty_and_whitespace() {
        // テスト項目: 空文字列や空白を含むハンドルは作成できない
        // given (前提条件):
        let inputs = ["", "al ice", " alice", "alice\t"];

        // when (操作) / then (期待する結果):
        for input in inputs {
            assert_eq!(
                Handle::new(input.to_string()),
                Err(BoardError::InvalidHandle),
                "input: {input:?}"
            );
        }
        assert_eq!(Handle::new("alice".to_string()).unwrap().as_str(), "alice");
    }

    #[test]
    fn test_handle_is_case_sensitive() {
        // テスト項目: ハンドルは大文字小文字を区別する
        // given (前提条件):
        let lower = Handle::new("alice".to_string()).unwrap();

        // when (操作):
        let upper = Handle::new("Alice".to_string()).unwrap();

        // then (期待する結果):
        assert_ne!(lower, upper);
    }

    #[test]
    fn test_message_id_parse_accepts_positive_integers() {
        // テスト項目: 1 以上の整数は MessageId として解釈される
        // given (前提条件):
        let raw = "42";

        // when (操作):
        let id = MessageId::parse(raw);

        // then (期待する結果):
        assert_eq!(id.map(|id| id.value()), Ok(42));
    }

    #[test]
    fn test_message_id_parse_rejects_invalid_input() {
        // テスト項目: 数値でない・範囲外の ID は InvalidId になる
        // given (前提条件):
        let inputs = ["abc", "0", "-1", "1.5", "", "99999999999999999999999"];

        // when (操作) / then (期待する結果):
        for input in inputs {
            assert_eq!(
                MessageId::parse(input),
                Err(BoardError::InvalidId(input.to_string())),
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn test_timestamp_display_uses_board_format() {
        // テスト項目: Timestamp は掲示板の表示形式で出力される
        // given (前提条件):
        let timestamp = Timestamp::new(1672498800000);

        // when (操作):
        let displayed = timestamp.to_string();

        // then (期待する結果):
        assert_eq!(displayed, "2023-01-01 00:00:00");
    }
}
