//! ドメイン層
//!
//! 掲示板の共有状態（クライアント登録簿、チャンネル、メッセージログ）と、
//! それを操作するためのインターフェース（Repository / MessagePusher）を定義します。

pub mod board;
pub mod channel;
pub mod client_registry;
pub mod entity;
pub mod error;
pub mod message_log;
pub mod notice;
pub mod pusher;
pub mod repository;
pub mod value_object;

pub use board::{
    Audience, Board, ChannelDeparture, ChannelJoin, ChannelSnapshot, Delivery, Departure,
    Pruned, Registration,
};
pub use channel::{Channel, ChannelRegistry};
pub use client_registry::ClientRegistry;
pub use entity::{ChatMessage, Client};
pub use error::BoardError;
pub use message_log::MessageLog;
pub use notice::Notice;
pub use pusher::{MessagePushError, MessagePusher, PusherChannel};
#[cfg(test)]
pub use pusher::MockMessagePusher;
pub use repository::BoardRepository;
pub use value_object::{ChannelName, ConnectionId, Handle, MessageId, Timestamp};
