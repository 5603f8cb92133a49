use super::*;
use crate::gameroom::Observer;
use crate::gameroom::Snapshot;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

/// Engine observer that relays snapshots to both seated connections and
/// hands the final snapshot to the match's completion task.
pub struct Fanout {
    outboxes: [UnboundedSender<String>; 2],
    started: bool,
    done: Option<oneshot::Sender<Snapshot>>,
}

impl Fanout {
    pub fn new(outboxes: [UnboundedSender<String>; 2], done: oneshot::Sender<Snapshot>) -> Self {
        Self {
            outboxes,
            started: false,
            done: Some(done),
        }
    }
    fn broadcast(&self, msg: ServerMessage) {
        let json = Protocol::encode(&msg);
        for outbox in self.outboxes.iter() {
            // a closed outbox belongs to a connection that is already disconnecting
            let _ = outbox.send(json.clone());
        }
    }
}

impl Observer for Fanout {
    fn update(&mut self, snapshot: &Snapshot) {
        match std::mem::replace(&mut self.started, true) {
            false => self.broadcast(ServerMessage::game_start(snapshot)),
            true => self.broadcast(ServerMessage::game_update(snapshot)),
        }
    }
    fn end(&mut self, snapshot: &Snapshot) -> anyhow::Result<()> {
        self.done
            .take()
            .ok_or_else(|| anyhow::anyhow!("match {} already completed", snapshot.match_id))?
            .send(snapshot.clone())
            .map_err(|_| anyhow::anyhow!("completion task for match {} is gone", snapshot.match_id))
    }
}
