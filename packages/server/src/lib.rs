//! Multi-client text bulletin board.
//!
//! Clients register a unique handle, post to a global message log, join named
//! channels with their own logs, and retrieve messages by ID.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
