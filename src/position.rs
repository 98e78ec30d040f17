use std::fmt;

use serde::{Deserialize, Serialize};

/// A (row, column) square. Rows grow away from the first player's back rank.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i32,
    pub column: i32,
}

impl Position {
    /// Where captured pieces go.
    pub const NOWHERE: Position = Position { row: -1, column: -1 };

    pub const fn new(row: i32, column: i32) -> Self {
        Position { row, column }
    }

    pub fn is_nowhere(&self) -> bool {
        *self == Self::NOWHERE
    }

    pub fn is_in_bounds(&self, n_row: i32, n_column: i32) -> bool {
        (0..n_row).contains(&self.row) && (0..n_column).contains(&self.column)
    }

    /// Shift by a (row, column) delta.
    pub fn offset(&self, d_row: i32, d_column: i32) -> Position {
        Position::new(self.row + d_row, self.column + d_column)
    }

    /// Algebraic name, e.g. "e2". `None` for squares outside a..z / 1..99.
    pub fn to_algebraic(&self) -> Option<String> {
        if !(0..26).contains(&self.column) || !(0..99).contains(&self.row) {
            return None;
        }
        let file = (b'a' + self.column as u8) as char;
        Some(format!("{file}{}", self.row + 1))
    }

    /// Parse an algebraic name such as "a1" or "h8".
    pub fn from_algebraic(s: &str) -> Option<Position> {
        let mut chars = s.chars();
        let file = chars.next()?;
        if !file.is_ascii_lowercase() {
            return None;
        }
        let rank: i32 = chars.as_str().parse().ok()?;
        if rank < 1 {
            return None;
        }
        Some(Position::new(rank - 1, (file as u8 - b'a') as i32))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::NOWHERE
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn bounds_are_half_open() {
        for row in -2..10 {
            for column in -2..10 {
                let expected = (0..8).contains(&row) && (0..8).contains(&column);
                assert_eq!(Position::new(row, column).is_in_bounds(8, 8), expected);
            }
        }
        assert!(!Position::new(0, 0).is_in_bounds(0, 0));
    }

    #[test]
    fn default_is_nowhere() {
        assert_eq!(Position::default(), Position::new(-1, -1));
        assert!(Position::default().is_nowhere());
    }

    #[test]
    fn equal_positions_hash_equal() {
        let mut set = HashSet::new();
        set.insert(Position::new(3, 4));
        set.insert(Position::new(3, 4));
        assert_eq!(set.len(), 1);
        assert_ne!(Position::new(3, 4), Position::new(4, 3));
    }

    #[test]
    fn algebraic_names() {
        assert_eq!(Position::new(0, 0).to_algebraic().as_deref(), Some("a1"));
        assert_eq!(Position::new(7, 4).to_algebraic().as_deref(), Some("e8"));
        assert_eq!(Position::NOWHERE.to_algebraic(), None);
        assert_eq!(Position::from_algebraic("e2"), Some(Position::new(1, 4)));
        assert_eq!(Position::from_algebraic("h8"), Some(Position::new(7, 7)));
        assert_eq!(Position::from_algebraic("E2"), None);
        assert_eq!(Position::from_algebraic("a0"), None);
        assert_eq!(Position::from_algebraic(""), None);
    }
}
