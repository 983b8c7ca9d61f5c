//! Conversion logic from domain entities to DTOs.

use kairan_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{ChannelSnapshot, ChatMessage};

use super::http::{GroupDetailDto, GroupSummaryDto, MessageDto};

impl From<ChatMessage> for MessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            id: model.id.value(),
            author: model.author.into_string(),
            timestamp: timestamp_to_jst_rfc3339(model.timestamp.value()),
            body: model.body,
        }
    }
}

impl From<ChannelSnapshot> for GroupSummaryDto {
    fn from(model: ChannelSnapshot) -> Self {
        Self {
            name: model.name.to_string(),
            members: model.members.into_iter().map(|h| h.into_string()).collect(),
            message_count: model.messages.len(),
        }
    }
}

impl From<ChannelSnapshot> for GroupDetailDto {
    fn from(model: ChannelSnapshot) -> Self {
        Self {
            name: model.name.to_string(),
            members: model.members.into_iter().map(|h| h.into_string()).collect(),
            messages: model.messages.into_iter().map(MessageDto::from).collect(),
        }
    }
}
