//! Data Transfer Objects (DTOs) for the bulletin board.
//!
//! The command channel is plain text, so only the HTTP inspection API has DTOs:
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
