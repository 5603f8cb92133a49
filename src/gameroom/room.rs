use super::*;
use crate::ID;
use crate::Ply;
use crate::Unique;
use serde_json::Value;
use tokio::sync::mpsc::*;

/// Inputs routed to a live match.
#[derive(Debug, Clone)]
pub enum Command {
    Play {
        caller: ID<Connection>,
        position: Value,
    },
    Resign {
        caller: ID<Connection>,
    },
}

/// Single task that owns one [`Engine`].
/// Moves, resignations and timer firings are all handled in this task's loop,
/// so no two of them can interleave on the same match.
///
/// Room runs until the match is terminal:
/// - Command: apply move or resignation
/// - Alarm: expire the turn it was armed for (stale alarms are ignored)
///
/// Commands are polled first, so a move that arrives before the alarm is
/// serviced ahead of the timeout it would otherwise race with.
pub struct Room {
    engine: Engine,
    inbox: UnboundedReceiver<Command>,
}

impl Room {
    /// Runs the engine in its own task and returns the command sender.
    pub fn spawn(engine: Engine) -> UnboundedSender<Command> {
        let (tx, rx) = unbounded_channel();
        let room = Self { engine, inbox: rx };
        tokio::spawn(room.run());
        tx
    }
    async fn run(mut self) {
        let id = self.engine.id();
        log::debug!("[room {}] open", id);
        while !self.engine.is_over() {
            let alarm = self.engine.alarm();
            tokio::select! {
                biased;
                cmd = self.inbox.recv() => match cmd {
                    Some(cmd) => self.apply(cmd),
                    None => {
                        log::warn!("[room {}] coordinator dropped, abandoning match", id);
                        break;
                    }
                },
                expected = Self::ring(alarm) => self.engine.expire(expected),
            }
        }
        log::debug!("[room {}] closed", id);
    }
    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::Play { caller, position } => self.engine.play(caller, &position),
            Command::Resign { caller } => self.engine.resign(caller),
        }
    }
    /// Resolves with the alarm's expected move once it fires.
    /// Without an alarm it never resolves.
    async fn ring(alarm: Option<Alarm>) -> Ply {
        match alarm {
            Some(alarm) => {
                tokio::time::sleep_until(alarm.fires()).await;
                alarm.expected()
            }
            None => std::future::pending().await,
        }
    }
}
