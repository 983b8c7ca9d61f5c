//! Interactive line client for the Kairan bulletin board.

mod error;
mod runner;
mod session;
mod ui;

pub use error::ClientError;
pub use runner::run_client;
