//! Single-room WebSocket chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hatchat-server
//! cargo run --bin hatchat-server -- --host 0.0.0.0 --port 3000 --data-dir /var/lib/hatchat
//! ```

use std::path::PathBuf;

use clap::Parser;
use hatchat_server::{app::build_server, config::ServerConfig, domain::PageSize};
use hatchat_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hatchat-server")]
#[command(about = "Single-room WebSocket chat server with persisted history", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HATCHAT_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HATCHAT_PORT", default_value = "8080")]
    port: u16,

    /// Directory for messages.json, colors.json and transcripts.json
    #[arg(long, env = "HATCHAT_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Messages per history page
    #[arg(long, env = "HATCHAT_PAGE_SIZE", default_value_t = 20)]
    page_size: usize,

    /// Keep all state in memory
    #[arg(long)]
    ephemeral: bool,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let page_size = match PageSize::new(args.page_size) {
        Ok(page_size) => page_size,
        Err(e) => {
            tracing::error!("Invalid --page-size: {}", e);
            std::process::exit(1);
        }
    };

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        data_dir: args.data_dir,
        page_size,
        ephemeral: args.ephemeral,
    };

    let server = build_server(&config).await;
    if let Err(e) = server.run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
