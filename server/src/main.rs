//! centre-server: HTTP surface for the banking command centre.
//!
//! Usage:
//!   centre-server --port 8600 --db state.db --seed 12345
//!   centre-server --chat-url https://api.openai.com/v1/chat/completions

use anyhow::Result;
use centre_server::{config::ServerConfig, server::Server};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = ServerConfig::from_args(&args);

    log::info!(
        "starting centre-server v{} (seed={}, db={})",
        centre_server::VERSION,
        config.seed,
        config.db_path
    );

    Server::new(config)?.run().await
}
