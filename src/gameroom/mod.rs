//! Match engine for a single two-participant game.
//!
//! - [`Engine`] — State machine owning board, turn, move counter and outcome
//! - [`Room`] — Task that serializes commands and turn timeouts for one engine
//! - [`Observer`] — Where the engine sends its snapshots
//! - [`Timer`] — The single outstanding turn deadline of a match
mod board;
mod engine;
mod error;
mod mark;
mod observer;
mod outcome;
mod participant;
mod room;
mod snapshot;
mod timer;

pub use board::*;
pub use engine::*;
pub use error::*;
pub use mark::*;
pub use observer::*;
pub use outcome::*;
pub use participant::*;
pub use room::*;
pub use snapshot::*;
pub use timer::*;
