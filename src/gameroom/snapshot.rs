use super::*;
use crate::ID;
use crate::Millis;
use crate::Ply;
use serde::Serialize;

/// Complete externally visible state of a match at one instant.
/// Carries public identities only; never callbacks or connection handles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub match_id: ID<Engine>,
    pub board: Board,
    pub current_turn: Mark,
    pub is_game_over: bool,
    pub result: Option<Outcome>,
    pub reason: Option<Reason>,
    pub winner: Option<Mark>,
    #[serde(rename = "move")]
    pub ply: Ply,
    pub deadline: Millis,
    pub error: String,
    pub players: Players,
}

/// Public identities keyed by mark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Players {
    #[serde(rename = "X")]
    pub x: Participant,
    #[serde(rename = "O")]
    pub o: Participant,
}

impl Players {
    pub fn get(&self, mark: Mark) -> &Participant {
        match mark {
            Mark::X => &self.x,
            Mark::O => &self.o,
        }
    }
}
