//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// One entry of `GET /api/groups`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummaryDto {
    pub name: String,
    pub members: Vec<String>,
    pub message_count: usize,
}

/// Response of `GET /api/groups/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDetailDto {
    pub name: String,
    pub members: Vec<String>,
    pub messages: Vec<MessageDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: u64,
    pub author: String,
    /// RFC 3339 (JST)
    pub timestamp: String,
    pub body: String,
}
