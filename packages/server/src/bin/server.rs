//! Multi-client bulletin-board chat server.
//!
//! Clients connect over WebSocket, register a unique handle, and then issue
//! line commands (`post`, `group_join`, `retrieve_message`, ...).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairan-server
//! cargo run --bin kairan-server -- --host 0.0.0.0 --port 3000 --groups General,Random
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use kairan_server::{
    config::{BoardConfig, DEFAULT_CHANNELS, DEFAULT_JOIN_HISTORY},
    domain::Board,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryBoardRepository},
    ui::{AppState, Server},
};
use kairan_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "kairan-server")]
#[command(about = "Multi-client text bulletin board over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "65432")]
    port: u16,

    /// Comma-separated fixed set of groups
    #[arg(short = 'g', long, value_delimiter = ',', default_values_t = DEFAULT_CHANNELS.map(String::from))]
    groups: Vec<String>,

    /// Keep only the most recent N messages in the global log (unbounded when unset)
    #[arg(long)]
    global_log_capacity: Option<usize>,

    /// Number of group messages replayed to a client joining a group
    #[arg(long, default_value_t = DEFAULT_JOIN_HISTORY)]
    join_history: usize,

    /// Do not replay history when a client rejoins a group it has left
    #[arg(long)]
    no_rejoin_history: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("kairan_server", env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let config = match BoardConfig::new(
        args.groups,
        args.global_log_capacity,
        args.join_history,
        !args.no_rejoin_history,
    ) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases (AppState)
    // 4. Server

    // 1. Create Repository (in-memory board)
    let board = Arc::new(Mutex::new(Board::new(&config)));
    let channel_names: Vec<String> = config.channels.iter().map(|c| c.to_string()).collect();
    tracing::info!("Board created with groups: {}", channel_names.join(", "));
    let repository = Arc::new(InMemoryBoardRepository::new(board));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(message_pusher_clients));

    // 3. Create UseCases
    let state = AppState::new(repository, message_pusher, Arc::new(SystemClock));

    // 4. Create and run the server
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
