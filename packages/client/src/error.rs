//! Error types for the bulletin-board client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not open the WebSocket connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The connection dropped without a goodbye from the server
    #[error("Connection lost")]
    ConnectionLost,
}
