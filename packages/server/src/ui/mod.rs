//! Bulletin-board chat server: WebSocket command channel and HTTP inspection API.

mod command;
mod handler;
mod server;
mod session;
mod signal;
pub mod state;

pub use command::{Command, CommandError};
pub use handler::WELCOME;
pub use server::Server;
pub use session::{Flow, Session};
pub use state::AppState;
