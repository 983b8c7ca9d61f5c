//! Errors raised by board operations.
//!
//! The `Display` text is the human-readable part of an `Error: ...` reply.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Handle '{0}' is already taken.")]
    HandleTaken(String),

    #[error("Handle must be non-empty and must not contain whitespace.")]
    InvalidHandle,

    #[error("Group name '{0}' must be non-empty and must not contain whitespace.")]
    InvalidChannelName(String),

    #[error("You are already in the chat.")]
    AlreadyRegistered,

    #[error("You are not connected to the chat.")]
    NotRegistered,

    #[error("Group '{0}' does not exist.")]
    NoSuchChannel(String),

    #[error("You are already a member of '{0}'.")]
    AlreadyMember(String),

    #[error("You are not a member of '{0}'.")]
    NotMember(String),

    #[error("Message ID {0} not found.")]
    NotFound(u64),

    #[error("Invalid message ID '{0}'.")]
    InvalidId(String),
}
