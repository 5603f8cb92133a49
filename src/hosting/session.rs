use super::*;
use crate::ID;
use crate::gameroom::Connection;
use crate::gameroom::Engine;
use crate::gameroom::Participant;
use tokio::sync::mpsc::UnboundedSender;

/// Coordinator-side state of one connection.
#[derive(Debug)]
pub struct Session {
    participant: Participant,
    outbox: UnboundedSender<String>,
    room: Option<RoomHandle>,
}

impl Session {
    pub fn new(conn: ID<Connection>, outbox: UnboundedSender<String>) -> Self {
        Self {
            participant: Participant::anonymous(conn),
            outbox,
            room: None,
        }
    }
    pub fn participant(&self) -> &Participant {
        &self.participant
    }
    pub fn outbox(&self) -> &UnboundedSender<String> {
        &self.outbox
    }
    pub fn room(&self) -> Option<&RoomHandle> {
        self.room.as_ref()
    }
    pub fn register(&mut self, participant: Participant) {
        self.participant = participant;
    }
    /// The transport still reads from this connection.
    pub fn is_live(&self) -> bool {
        !self.outbox.is_closed()
    }
    /// Bound to a match that has not finished.
    pub fn is_playing(&self) -> bool {
        self.room.as_ref().is_some_and(RoomHandle::is_live)
    }
    pub fn bind(&mut self, room: RoomHandle) {
        self.room = Some(room);
    }
    /// Clears the binding if it still points at `id`.
    pub fn release(&mut self, id: ID<Engine>) -> bool {
        match self.room.as_ref().map(RoomHandle::id) {
            Some(bound) if bound == id => {
                self.room = None;
                true
            }
            _ => false,
        }
    }
}
