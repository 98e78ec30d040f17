use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, ChessResult};
use crate::piece::PieceId;
use crate::position::Position;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
pub enum MoveType {
    /// The mover lands on an empty square.
    #[default]
    Displacement,
    /// The occupant of the destination is sent to `Position::NOWHERE`.
    Capture,
    /// King and rook relocate together (castling).
    Swap,
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoveType::Displacement => "DISPLACEMENT",
            MoveType::Capture => "CAPTURE",
            MoveType::Swap => "SWAP",
        };
        f.write_str(name)
    }
}

/// One piece travelling from one square to another.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
pub struct Action {
    piece: Option<PieceId>,
    from: Position,
    to: Position,
}

impl Action {
    pub fn new(piece: PieceId, from: Position, to: Position) -> Self {
        Action {
            piece: Some(piece),
            from,
            to,
        }
    }

    /// The arena index of the moving piece. Fails on a default action.
    pub fn piece(&self) -> ChessResult<PieceId> {
        self.piece
            .ok_or_else(|| ChessError::invariant("Action refers to a null piece"))
    }

    pub fn from(&self) -> Position {
        self.from
    }

    pub fn to(&self) -> Position {
        self.to
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.piece {
            Some(id) => write!(f, "Action({id}, {} -> {})", self.from, self.to),
            None => write!(f, "Action(null, {} -> {})", self.from, self.to),
        }
    }
}

/// A complete turn: the mover's action first, then any side effects.
///
/// Equality and hashing respect action order.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
pub struct Move {
    move_type: MoveType,
    actions: Vec<Action>,
}

impl Move {
    pub fn new(move_type: MoveType) -> Self {
        Move {
            move_type,
            actions: Vec::new(),
        }
    }

    pub fn displacement(piece: PieceId, from: Position, to: Position) -> Self {
        let mut mv = Move::new(MoveType::Displacement);
        mv.add(Action::new(piece, from, to));
        mv
    }

    /// The mover lands on `to` and `captured` (standing on `to`) leaves the board.
    pub fn capture(piece: PieceId, from: Position, to: Position, captured: PieceId) -> Self {
        let mut mv = Move::new(MoveType::Capture);
        mv.add(Action::new(piece, from, to));
        mv.add(Action::new(captured, to, Position::NOWHERE));
        mv
    }

    pub fn swap(king: Action, rook: Action) -> Self {
        let mut mv = Move::new(MoveType::Swap);
        mv.add(king);
        mv.add(rook);
        mv
    }

    pub fn add(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn move_type(&self) -> MoveType {
        self.move_type
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The mover's landing square.
    pub fn destination(&self) -> Option<Position> {
        self.actions.first().map(Action::to)
    }

    /// Coordinate notation of the mover's action, e.g. "e2e4".
    pub fn notation(&self) -> Option<String> {
        let first = self.actions.first()?;
        Some(format!(
            "{}{}",
            first.from().to_algebraic()?,
            first.to().to_algebraic()?
        ))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}, [", self.move_type)?;
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{action}")?;
        }
        write!(f, "])")
    }
}
