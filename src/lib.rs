//! Two-player tic-tac-toe match server.
//!
//! ## Modules
//!
//! - [`gameroom`] — Match engine state machine and the per-match actor that
//!   serializes moves, resignations and turn timeouts
//! - [`hosting`] — Matchmaking lobby, session coordinator, and the
//!   WebSocket/HTTP surface
//! - [`leaderboard`] — Cumulative win/loss/tie statistics behind a serialized
//!   read-modify-write queue
pub mod gameroom;
pub mod hosting;
pub mod leaderboard;

#[cfg(feature = "server")]
mod config;
#[cfg(feature = "server")]
pub use config::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Cell index on the 3x3 board, row-major from the top-left corner.
pub type Position = usize;
/// Number of accepted moves in a match.
pub type Ply = u32;
/// Wall-clock timestamp in milliseconds since the Unix epoch.
pub type Millis = u64;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
/// The marker is `fn() -> T` so an id is Send + Sync whatever `T` is.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<fn() -> T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Last four characters of the rendered id, used for fallback nicknames.
    pub fn suffix(&self) -> String {
        let s = self.inner.simple().to_string();
        s[s.len() - 4..].to_string()
    }
}

impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::from(uuid::Uuid::now_v7())
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner.simple(), f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

// ============================================================================
// MATCH PARAMETERS
// ============================================================================
/// Number of cells on the board.
pub const CELLS: usize = 9;
/// Time a participant has to move before forfeiting (milliseconds).
pub const TURN_MILLIS: u64 = 21_000;
/// Scheduling slack added before a timeout is declared (milliseconds).
/// Not part of the deadline advertised to participants.
pub const GRACE_MILLIS: u64 = 10;
/// Maximum nickname length in characters after trimming.
pub const MAX_NICKNAME_LENGTH: usize = 20;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Current wall-clock time in epoch milliseconds.
pub fn now() -> Millis {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as Millis)
        .unwrap_or_default()
}

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, `level` to terminal.
#[cfg(feature = "server")]
pub fn log(level: log::LevelFilter) -> anyhow::Result<()> {
    use anyhow::Context;
    std::fs::create_dir_all("logs").context("create logs directory")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", now() / 1000)).context("create log file")?,
    );
    let term = simplelog::TermLogger::new(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).context("initialize logger")
}
