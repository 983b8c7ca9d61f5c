//! メッセージ送信（通知）の実装
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! - `websocket`: 接続ごとの送信キューを経由して WebSocket に書き出す実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
