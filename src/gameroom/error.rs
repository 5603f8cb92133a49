use super::*;

/// Reasons a move is refused. Recorded on the match and shown to both
/// participants; never fatal and never changes the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    OutOfRange,
    Unbound,
    OutOfTurn(Mark),
    Occupied,
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "Invalid move: position must be 0-8"),
            Self::Unbound => write!(f, "Invalid player"),
            Self::OutOfTurn(turn) => write!(f, "Not your turn (current: {})", turn),
            Self::Occupied => write!(f, "Position already occupied"),
        }
    }
}

impl std::error::Error for MoveError {}
