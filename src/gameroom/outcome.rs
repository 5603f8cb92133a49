use super::*;
use serde::Serialize;

/// Final result of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    XWins,
    OWins,
    Draw,
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    Timeout,
    PlayerLeft,
    Win,
    BoardFull,
}

impl Outcome {
    pub fn victory(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::XWins,
            Mark::O => Self::OWins,
        }
    }
    /// Winning mark, or None for a draw.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            Self::XWins => Some(Mark::X),
            Self::OWins => Some(Mark::O),
            Self::Draw => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XWins => write!(f, "X won"),
            Self::OWins => write!(f, "O won"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::PlayerLeft => write!(f, "participant left"),
            Self::Win => write!(f, "win"),
            Self::BoardFull => write!(f, "board full"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn victory_round_trips_through_winner() {
        for mark in Mark::all() {
            assert_eq!(Outcome::victory(mark).winner(), Some(mark));
        }
        assert_eq!(Outcome::Draw.winner(), None);
    }
    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&Outcome::XWins).unwrap(), "\"X_WINS\"");
        assert_eq!(serde_json::to_string(&Outcome::Draw).unwrap(), "\"DRAW\"");
        assert_eq!(serde_json::to_string(&Reason::PlayerLeft).unwrap(), "\"PLAYER_LEFT\"");
        assert_eq!(serde_json::to_string(&Reason::BoardFull).unwrap(), "\"BOARD_FULL\"");
    }
}
