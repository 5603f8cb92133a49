use super::*;
use crate::CELLS;
use crate::Position;
use serde::Serialize;
use serde_json::Value;

/// The eight winning triples: rows, columns, diagonals.
const LINES: [[Position; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Fixed 3x3 grid of cells, row-major.
/// Cells only ever go from empty to occupied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board([Option<Mark>; CELLS]);

impl Board {
    pub fn get(&self, pos: Position) -> Option<Mark> {
        self.0.get(pos).copied().flatten()
    }
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }
    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }
    /// Occupies an empty cell. Returns false (and leaves the board untouched)
    /// when the cell is out of range or already taken.
    pub fn place(&mut self, pos: Position, mark: Mark) -> bool {
        match self.0.get_mut(pos) {
            Some(cell) if cell.is_none() => {
                *cell = Some(mark);
                true
            }
            _ => false,
        }
    }
    /// Mark owning a complete line, if any.
    pub fn winner(&self) -> Option<Mark> {
        LINES.iter().find_map(|&[a, b, c]| {
            self.get(a)
                .filter(|&m| self.get(b) == Some(m) && self.get(c) == Some(m))
        })
    }
    /// Coerces a client-supplied position into a cell index.
    /// Integral numbers and numeric strings are accepted; anything else,
    /// or anything outside the board, is rejected.
    pub fn index(raw: &Value) -> Option<Position> {
        let n = match raw {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        (n.fract() == 0.0 && n >= 0.0 && n < CELLS as f64).then_some(n as Position)
    }
}

impl From<[Option<Mark>; CELLS]> for Board {
    fn from(cells: [Option<Mark>; CELLS]) -> Self {
        Self(cells)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.0.chunks(3) {
            for cell in row {
                match cell {
                    Some(m) => write!(f, "{}", m)?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
