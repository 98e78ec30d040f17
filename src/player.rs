use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Which half of the board a player starts on.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Starts on rows 0 and 1, pawns advance toward higher rows.
    First,
    /// Starts on the last two rows, pawns advance toward row 0.
    Second,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Row delta of a forward pawn step.
    pub fn forward(&self) -> i32 {
        match self {
            Side::First => 1,
            Side::Second => -1,
        }
    }
}

/// A named participant. Two players are equal when their names are.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Player {
    name: String,
    side: Side,
}

impl Player {
    pub fn new(name: impl Into<String>, side: Side) -> Self {
        Player {
            name: name.into(),
            side,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn side(&self) -> Side {
        self.side
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player({})", self.name)
    }
}
