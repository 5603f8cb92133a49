use serde::Serialize;

/// One of the two turn-taking roles in a match.
/// X always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The other role.
    pub fn opponent(&self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }
    /// Seat index used to address per-mark arrays.
    pub fn seat(&self) -> usize {
        match self {
            Self::X => 0,
            Self::O => 1,
        }
    }
    pub fn all() -> [Self; 2] {
        [Self::X, Self::O]
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
        }
    }
}
