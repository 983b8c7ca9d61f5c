//! Notifications fanned out to a membership set.

use std::fmt;

use super::{
    entity::ChatMessage,
    value_object::{ChannelName, Handle},
};

#[derive(Debug, Clone, Copy)]
pub enum Notice<'a> {
    JoinedChat(&'a Handle),
    LeftChat(&'a Handle),
    JoinedChannel {
        handle: &'a Handle,
        channel: &'a ChannelName,
    },
    LeftChannel {
        handle: &'a Handle,
        channel: &'a ChannelName,
    },
    Post(&'a ChatMessage),
    ChannelPost {
        channel: &'a ChannelName,
        message: &'a ChatMessage,
    },
}

impl fmt::Display for Notice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::JoinedChat(handle) => write!(f, "{handle} has joined the chat."),
            Notice::LeftChat(handle) => write!(f, "{handle} has left the chat."),
            Notice::JoinedChannel { handle, channel } => write!(f, "{handle} has joined {channel}."),
            Notice::LeftChannel { handle, channel } => write!(f, "{handle} has left {channel}."),
            Notice::Post(message) => write!(f, "{message}"),
            Notice::ChannelPost { channel, message } => write!(f, "[{channel}] {message}"),
        }
    }
}
