//! Game room server with WebSocket gateway and HTTP introspection API.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tictac-server -- --port 5050
//! ```

use clap::Parser;

use tictac_rooms_rs::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "tictac-server", about = "Turn-based grid game room server")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5050)]
    port: u16,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    // Run the server
    if let Err(e) = tictac_rooms_rs::run_server(&args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
