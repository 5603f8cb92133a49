use crate::ID;
use crate::gameroom::Command;
use crate::gameroom::Engine;
use tokio::sync::mpsc::UnboundedSender;

/// Handle to communicate with a running room.
/// The room drops its receiver when the match ends, which is how the
/// coordinator tells a live binding from a finished one.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    id: ID<Engine>,
    tx: UnboundedSender<Command>,
}

impl RoomHandle {
    pub fn new(id: ID<Engine>, tx: UnboundedSender<Command>) -> Self {
        Self { id, tx }
    }
    pub fn id(&self) -> ID<Engine> {
        self.id
    }
    pub fn is_live(&self) -> bool {
        !self.tx.is_closed()
    }
    /// Forwards a command; false if the room has already closed.
    pub fn send(&self, cmd: Command) -> bool {
        self.tx.send(cmd).is_ok()
    }
}
