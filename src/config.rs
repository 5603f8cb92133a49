use crate::gameroom::TimerConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the hosting server.
/// Every flag can also be supplied through its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address the HTTP/WebSocket server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8888")]
    pub bind: String,
    /// JSON file holding the leaderboard
    #[arg(long, env = "LEADERBOARD_PATH", default_value = "leaderboard.json")]
    pub store: PathBuf,
    /// Seconds a participant has to make a move
    #[arg(long, env = "TURN_SECS", default_value_t = 21)]
    pub turn_secs: u64,
    /// Milliseconds of slack before a turn timeout fires
    #[arg(long, env = "GRACE_MS", default_value_t = 10)]
    pub grace_ms: u64,
    /// HTTP worker threads
    #[arg(long, env = "WORKERS", default_value_t = 4)]
    pub workers: usize,
    /// Terminal log level (the log file always records debug)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: log::LevelFilter,
}

impl Config {
    pub fn timer(&self) -> TimerConfig {
        TimerConfig {
            turn: Duration::from_secs(self.turn_secs),
            grace: Duration::from_millis(self.grace_ms),
        }
    }
}
