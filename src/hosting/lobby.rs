use crate::ID;
use crate::gameroom::Connection;
use std::collections::VecDeque;

/// Connections waiting for an opponent, in arrival order.
///
/// Pairing always takes the two earliest waiters. The lobby itself holds no
/// lock; the coordinator serializes access so that a join and its pairing are
/// a single step.
#[derive(Debug, Default)]
pub struct Lobby {
    queue: VecDeque<ID<Connection>>,
}

impl Lobby {
    /// Adds a waiter (no-op if already waiting) and pairs if possible.
    pub fn join(&mut self, conn: ID<Connection>) -> Option<(ID<Connection>, ID<Connection>)> {
        if !self.contains(conn) {
            self.queue.push_back(conn);
        }
        self.pair()
    }
    /// Removes the two earliest waiters, if there are two.
    pub fn pair(&mut self) -> Option<(ID<Connection>, ID<Connection>)> {
        if self.queue.len() < 2 {
            return None;
        }
        let first = self.queue.pop_front()?;
        let second = self.queue.pop_front()?;
        Some((first, second))
    }
    pub fn leave(&mut self, conn: ID<Connection>) -> bool {
        let before = self.queue.len();
        self.queue.retain(|c| *c != conn);
        before != self.queue.len()
    }
    /// Returns a candidate from a failed pairing to the head of the queue.
    pub fn requeue(&mut self, conn: ID<Connection>) {
        if !self.contains(conn) {
            self.queue.push_front(conn);
        }
    }
    pub fn contains(&self, conn: ID<Connection>) -> bool {
        self.queue.contains(&conn)
    }
    pub fn len(&self) -> usize {
        self.queue.len()
    }
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
