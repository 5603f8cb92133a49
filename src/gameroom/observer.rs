use super::*;

/// Receives snapshots from an [`Engine`].
/// Implementations decide where snapshots go (sockets, channels, test buffers);
/// the engine is transport-agnostic.
///
/// Observers are called synchronously from within the engine's serialized
/// context, so they should hand work off rather than block.
pub trait Observer: Send {
    /// Called on every state change, starting with the initial board.
    fn update(&mut self, snapshot: &Snapshot);
    /// Called exactly once, right after the final `update`, when the match
    /// becomes terminal. Errors are reported but cannot undo the ending.
    fn end(&mut self, snapshot: &Snapshot) -> anyhow::Result<()>;
}
