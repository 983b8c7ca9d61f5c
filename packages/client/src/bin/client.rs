//! Interactive bulletin-board client.
//!
//! Prints every line the server sends and forwards each input line as a
//! command. Reconnects on connection loss (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairan-client
//! cargo run --bin kairan-client -- --handle alice
//! cargo run --bin kairan-client -- -u ws://192.168.0.10:65432/ws
//! ```

use clap::Parser;
use kairan_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kairan-client")]
#[command(about = "Interactive client for the Kairan bulletin board", long_about = None)]
struct Args {
    /// Handle to register with right after connecting
    #[arg(short = 'n', long)]
    handle: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:65432/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger("kairan_client", env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = kairan_client::run_client(args.url, args.handle).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
