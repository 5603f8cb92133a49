//! Matchmaking and session coordination.
//!
//! - [`Lobby`] — First-come waiting queue that pairs connections
//! - [`Casino`] — Routes connection events to the lobby or a room, fans out
//!   snapshots, settles statistics when a match ends
//! - [`Protocol`] — JSON text frames exchanged with clients
//! - `Server` — actix-web surface (WebSocket, nickname, leaderboard)
mod casino;
mod fanout;
mod handle;
mod lobby;
mod protocol;
mod session;

pub use casino::*;
pub use fanout::*;
pub use handle::*;
pub use lobby::*;
pub use protocol::*;
pub use session::*;

#[cfg(feature = "server")]
mod server;
#[cfg(feature = "server")]
pub use server::*;
