//! Cumulative per-participant statistics.
//!
//! - [`Standings`] — id → [`Entry`] mapping with settle/ensure rules
//! - [`Store`] — where standings live ([`Disk`], [`Memory`])
//! - [`Ledger`] — FIFO worker that owns every load/save against a store
mod disk;
mod entry;
mod ledger;
mod standings;
mod store;

pub use disk::*;
pub use entry::*;
pub use ledger::*;
pub use standings::*;
pub use store::*;
