//! hosting Server Binary
//!
//! Runs the tic-tac-toe match server: WebSocket play, nickname updates,
//! and the leaderboard.

use clap::Parser;
use tictac::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    log(config.log_level)?;
    hosting::Server::run(config).await?;
    Ok(())
}
