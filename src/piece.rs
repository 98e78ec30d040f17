use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::movegen;
use crate::moves::Move;
use crate::player::{Player, Side};
use crate::position::Position;

/// Index of a piece in the board's arena. Stable for the lifetime of the board.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub usize);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Pawn,
    ];

    /// Glyph used by board renderers.
    pub fn icon(&self) -> char {
        match self {
            PieceKind::King => '♔',
            PieceKind::Queen => '♕',
            PieceKind::Rook => '♖',
            PieceKind::Bishop => '♗',
            PieceKind::Knight => '♘',
            PieceKind::Pawn => '♙',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceKind::King => "KING",
            PieceKind::Queen => "QUEEN",
            PieceKind::Rook => "ROOK",
            PieceKind::Bishop => "BISHOP",
            PieceKind::Knight => "KNIGHT",
            PieceKind::Pawn => "PAWN",
        };
        f.write_str(name)
    }
}

/// Occupied squares of one side, as seen by move generation.
pub type PieceMap<'a> = HashMap<Position, &'a Piece>;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    position: Position,
    n_moves: u32,
    owner: Option<Player>,
}

impl Piece {
    /// An unowned piece that has never moved. The board assigns its id on placement.
    pub fn new(kind: PieceKind, position: Position) -> Self {
        Piece {
            id: PieceId(0),
            kind,
            position,
            n_moves: 0,
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: Player) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_id(mut self, id: PieceId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn n_moves(&self) -> u32 {
        self.n_moves
    }

    pub fn owner(&self) -> Option<&Player> {
        self.owner.as_ref()
    }

    pub fn side(&self) -> Option<Side> {
        self.owner.as_ref().map(Player::side)
    }

    pub fn icon(&self) -> char {
        self.kind.icon()
    }

    pub fn is_captured(&self) -> bool {
        self.position.is_nowhere()
    }

    /// Every destination this piece can reach, keyed by landing square.
    ///
    /// `friendlies` and `opponents` are only borrowed for the duration of the
    /// call. Returns an empty map when the piece stands outside the board.
    pub fn moves(
        &self,
        friendlies: &PieceMap,
        n_row: i32,
        n_column: i32,
        opponents: &PieceMap,
    ) -> HashMap<Position, Move> {
        movegen::moves(self, friendlies, n_row, n_column, opponents)
    }

    pub(crate) fn relocate(&mut self, to: Position) {
        self.position = to;
        self.n_moves += 1;
    }

    pub(crate) fn retreat(&mut self, to: Position) {
        self.position = to;
        self.n_moves = self.n_moves.saturating_sub(1);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.owner {
            Some(owner) => write!(f, "Piece({}, {}, {owner})", self.kind, self.position),
            None => write!(f, "Piece({}, {}, unowned)", self.kind, self.position),
        }
    }
}
