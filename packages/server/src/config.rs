//! Board configuration.
//!
//! The server binary builds this from its command-line flags.

use thiserror::Error;

use crate::domain::{BoardError, ChannelName};

/// Channels available when none are configured
pub const DEFAULT_CHANNELS: [&str; 5] = ["Group1", "Group2", "Group3", "Group4", "Group5"];

/// Number of channel messages replayed to a connection that joins a channel
pub const DEFAULT_JOIN_HISTORY: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidChannel(#[from] BoardError),

    #[error("group '{0}' is configured more than once")]
    DuplicateChannel(String),

    #[error("global log capacity must be at least 1")]
    ZeroCapacity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Fixed channel set, in listing order
    pub channels: Vec<ChannelName>,
    /// Retention bound of the global log (`None` keeps every message)
    pub global_log_capacity: Option<usize>,
    /// Channel messages replayed on join
    pub join_history: usize,
    /// Replay history again when a connection rejoins a channel it has left
    pub replay_history_on_rejoin: bool,
}

impl BoardConfig {
    pub fn new(
        channels: Vec<String>,
        global_log_capacity: Option<usize>,
        join_history: usize,
        replay_history_on_rejoin: bool,
    ) -> Result<Self, ConfigError> {
        let mut names: Vec<ChannelName> = Vec::with_capacity(channels.len());
        for raw in channels {
            let name = ChannelName::new(raw.trim().to_string())?;
            if names.contains(&name) {
                return Err(ConfigError::DuplicateChannel(name.to_string()));
            }
            names.push(name);
        }

        if global_log_capacity == Some(0) {
            return Err(ConfigError::ZeroCapacity);
        }

        Ok(Self {
            channels: names,
            global_log_capacity,
            join_history,
            replay_history_on_rejoin,
        })
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNELS
                .iter()
                .filter_map(|name| ChannelName::new(name.to_string()).ok())
                .collect(),
            global_log_capacity: None,
            join_history: DEFAULT_JOIN_HISTORY,
            replay_history_on_rejoin: true,
        }
    }
}
