use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ChessError, ChessResult};
use crate::history::UndoRedo;
use crate::moves::Move;
use crate::piece::{Piece, PieceId, PieceKind, PieceMap};
use crate::player::{Player, Side};
use crate::position::Position;
use crate::status::Status;

/// Back rank, column 0 first.
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Row-major copy of the board, `None` for empty squares.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct BoardSnapshot {
    pub squares: Vec<Vec<Option<Piece>>>,
}

impl BoardSnapshot {
    pub fn get(&self, position: Position) -> Option<&Piece> {
        if position.row < 0 || position.column < 0 {
            return None;
        }
        self.squares
            .get(position.row as usize)?
            .get(position.column as usize)?
            .as_ref()
    }

    pub fn to_json(&self) -> ChessResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The 16 pieces of each side on a board with `n_row` rows.
/// Player 1 takes rows 0 and 1, player 2 the last two rows.
pub fn standard_layout(n_row: i32, player1: &Player, player2: &Player) -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(32);
    for (player, back_row, pawn_row) in [(player1, 0, 1), (player2, n_row - 1, n_row - 2)] {
        for (column, kind) in BACK_RANK.iter().enumerate() {
            let square = Position::new(back_row, column as i32);
            pieces.push(Piece::new(*kind, square).with_owner(player.clone()));
        }
        for column in 0..BACK_RANK.len() as i32 {
            let square = Position::new(pawn_row, column);
            pieces.push(Piece::new(PieceKind::Pawn, square).with_owner(player.clone()));
        }
    }
    pieces
}

#[derive(Clone, Serialize, Debug)]
pub struct Board {
    n_row: i32,
    n_column: i32,
    n_moves: u32,
    status: Status,
    history: UndoRedo<Move>,
    pieces: Vec<Piece>,
}

impl Board {
    /// An empty board. Nothing can move until `initialize` places the pieces.
    pub fn new(n_row: i32, n_column: i32) -> Self {
        Board {
            n_row,
            n_column,
            n_moves: 0,
            status: Status::NotStarted,
            history: UndoRedo::new(),
            pieces: Vec::new(),
        }
    }

    /// (rows, columns)
    pub fn boundaries(&self) -> (i32, i32) {
        (self.n_row, self.n_column)
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Number of moves currently applied.
    pub fn n_moves(&self) -> u32 {
        self.n_moves
    }

    /// The whole arena, captured pieces included.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn active_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|piece| !piece.is_captured())
    }

    pub fn piece(&self, id: PieceId) -> ChessResult<&Piece> {
        self.pieces
            .get(id.0)
            .ok_or_else(|| ChessError::not_found(format!("This Piece does not exist: piece={id}")))
    }

    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.active_pieces()
            .find(|piece| piece.position() == position)
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.peek().ok()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Place the standard 32 pieces and open the game.
    pub fn initialize(&mut self, player1: &Player, player2: &Player) -> ChessResult<()> {
        if player1.side() != Side::First || player2.side() != Side::Second {
            return Err(ChessError::invariant(format!(
                "players must sit on opposite sides: {player1} is {:?}, {player2} is {:?}",
                player1.side(),
                player2.side()
            )));
        }
        if self.n_column < BACK_RANK.len() as i32 || self.n_row < 4 {
            return Err(ChessError::invalid_config(format!(
                "a {}x{} board cannot hold the standard layout",
                self.n_row, self.n_column
            )));
        }
        let layout = standard_layout(self.n_row, player1, player2);
        self.initialize_with(layout)?;
        info!(player1 = player1.name(), player2 = player2.name(), "board initialized");
        Ok(())
    }

    /// Place an arbitrary set of owned pieces and open the game.
    pub fn initialize_with(&mut self, pieces: impl IntoIterator<Item = Piece>) -> ChessResult<()> {
        if self.status != Status::NotStarted || !self.pieces.is_empty() {
            return Err(ChessError::invalid_state("The board has already been initialized"));
        }

        let mut arena = Vec::new();
        let mut occupied = HashSet::new();
        for (index, piece) in pieces.into_iter().enumerate() {
            let square = piece.position();
            if !square.is_in_bounds(self.n_row, self.n_column) {
                return Err(ChessError::invariant(format!("{piece} is outside the board")));
            }
            if piece.owner().is_none() {
                return Err(ChessError::invariant(format!("{piece} has no owner")));
            }
            if !occupied.insert(square) {
                return Err(ChessError::invariant(format!("square {square} is occupied twice")));
            }
            arena.push(piece.with_id(PieceId(index)));
        }

        self.pieces = arena;
        self.update_status(Side::First);
        Ok(())
    }

    // =========================================================================
    // Moves
    // =========================================================================

    /// Every destination `id` can reach right now, keyed by landing square.
    pub fn moves_for(&self, id: PieceId) -> ChessResult<HashMap<Position, Move>> {
        let piece = self.piece(id)?;
        let side = Self::side_of(piece)?;
        let friendlies = self.player_pieces(side, true);
        let opponents = self.player_pieces(side, false);
        Ok(piece.moves(&friendlies, self.n_row, self.n_column, &opponents))
    }

    /// All moves available to `side`, in arena order.
    pub fn moves_for_side(&self, side: Side) -> ChessResult<Vec<Move>> {
        let mut all = Vec::new();
        for piece in self.active_pieces().filter(|p| p.side() == Some(side)) {
            let mut moves: Vec<Move> = self.moves_for(piece.id())?.into_values().collect();
            moves.sort_by_key(|mv| mv.destination());
            all.extend(moves);
        }
        Ok(all)
    }

    /// Move `id` to `to`, applying every action of the resolved move.
    pub fn move_piece(&mut self, id: PieceId, to: Position) -> ChessResult<Move> {
        if self.status != Status::InProgress {
            return Err(ChessError::invalid_state(format!(
                "Board's status must be '{}', instead status='{}'",
                Status::InProgress,
                self.status
            )));
        }

        let piece = self.piece(id)?;
        let side = Self::side_of(piece)?;
        let mv = self
            .moves_for(id)?
            .remove(&to)
            .ok_or_else(|| ChessError::IllegalDestination {
                to: to.to_string(),
                piece: piece.to_string(),
            })?;

        let mover = mv
            .actions()
            .first()
            .ok_or_else(|| ChessError::invariant("resolved move has no actions"))?
            .piece()?;
        if mover != id {
            return Err(ChessError::invariant(format!(
                "The moving piece and the action piece must be the same: piece={id}, actionPiece={mover}"
            )));
        }

        self.play(&mv)?;
        self.history.record(mv.clone());
        self.n_moves += 1;
        let notation = mv.notation().unwrap_or_default();
        debug!(piece = %id, %notation, kind = %mv.move_type(), "move applied");

        self.update_status(side);
        Ok(mv)
    }

    /// Take back the latest move, restoring every piece it touched.
    pub fn undo_move(&mut self) -> ChessResult<Move> {
        self.require_started()?;
        let mv = self.history.peek()?.clone();
        self.unplay(&mv)?;
        self.history.undo()?;
        self.n_moves -= 1;
        let notation = mv.notation().unwrap_or_default();
        debug!(%notation, "move undone");

        self.refresh_status();
        Ok(mv)
    }

    /// Replay the latest undone move.
    pub fn redo_move(&mut self) -> ChessResult<Move> {
        self.require_started()?;
        let mv = self.history.peek_undone()?.clone();
        self.play(&mv)?;
        self.history.redo()?;
        self.n_moves += 1;
        let notation = mv.notation().unwrap_or_default();
        debug!(%notation, "move redone");

        self.refresh_status();
        Ok(mv)
    }

    fn require_started(&self) -> ChessResult<()> {
        if self.status == Status::NotStarted {
            return Err(ChessError::invalid_state("The board has not been initialized"));
        }
        Ok(())
    }

    /// Check every action first so a bad move leaves the board untouched.
    fn play(&mut self, mv: &Move) -> ChessResult<()> {
        let ids = self.action_pieces(mv)?;
        for (id, action) in ids.into_iter().zip(mv.actions()) {
            self.pieces[id.0].relocate(action.to());
        }
        Ok(())
    }

    fn unplay(&mut self, mv: &Move) -> ChessResult<()> {
        let ids = self.action_pieces(mv)?;
        for (id, action) in ids.into_iter().zip(mv.actions()).rev() {
            self.pieces[id.0].retreat(action.from());
        }
        Ok(())
    }

    fn action_pieces(&self, mv: &Move) -> ChessResult<Vec<PieceId>> {
        mv.actions()
            .iter()
            .map(|action| -> ChessResult<PieceId> {
                let id = action.piece()?;
                self.piece(id)?;
                Ok(id)
            })
            .collect()
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Re-derive the status from scratch after the history changed.
    fn refresh_status(&mut self) {
        self.status = Status::InProgress;
        let author = self
            .history
            .peek()
            .ok()
            .and_then(|mv| mv.actions().first())
            .and_then(|action| action.piece().ok())
            .and_then(|id| self.pieces.get(id.0))
            .and_then(Piece::side);
        if let Some(side) = author {
            self.update_status(side);
        }
    }

    /// `mover` just moved: judge the opponent's king.
    fn update_status(&mut self, mover: Side) {
        let next = self.derive_status(mover);
        if next != self.status {
            info!(from = %self.status, to = %next, "board status changed");
            self.status = next;
        }
    }

    fn derive_status(&self, mover: Side) -> Status {
        if self.status == Status::NotStarted && !self.history.can_undo() {
            return Status::InProgress;
        }

        // A captured king loses outright.
        let Some(king) = self.find_king(mover.opposite()) else {
            debug!(side = ?mover.opposite(), "king has been captured");
            return Status::EndedCheckmate;
        };

        let friendlies = self.player_pieces(mover, true);
        let opponents = self.player_pieces(mover, false);

        let king_has_moves = !king
            .moves(&opponents, self.n_row, self.n_column, &friendlies)
            .is_empty();
        let king_is_threatened = friendlies.values().any(|piece| {
            piece
                .moves(&friendlies, self.n_row, self.n_column, &opponents)
                .contains_key(&king.position())
        });

        if !king_has_moves && king_is_threatened {
            return Status::EndedCheckmate;
        }
        let king_is_last_piece = opponents.len() == 1;
        if !king_has_moves && !king_is_threatened && king_is_last_piece {
            return Status::EndedStalemate;
        }
        self.status
    }

    pub fn find_king(&self, side: Side) -> Option<&Piece> {
        self.active_pieces()
            .find(|piece| piece.kind() == PieceKind::King && piece.side() == Some(side))
    }

    /// Active pieces keyed by square: those of `side` when `is_friendly`,
    /// everyone else's otherwise.
    pub fn player_pieces(&self, side: Side, is_friendly: bool) -> PieceMap<'_> {
        self.active_pieces()
            .filter(|piece| (piece.side() == Some(side)) == is_friendly)
            .map(|piece| (piece.position(), piece))
            .collect()
    }

    fn side_of(piece: &Piece) -> ChessResult<Side> {
        piece
            .side()
            .ok_or_else(|| ChessError::invariant(format!("{piece} has no owner")))
    }

    /// Row-major grid of the active pieces. Pieces outside the grid are left out.
    pub fn serialize(&self) -> BoardSnapshot {
        let columns = self.n_column.max(0) as usize;
        let mut squares = vec![vec![None; columns]; self.n_row.max(0) as usize];
        for piece in self.active_pieces() {
            let square = piece.position();
            if !square.is_in_bounds(self.n_row, self.n_column) {
                continue;
            }
            if let Some(cell) = squares
                .get_mut(square.row as usize)
                .and_then(|row| row.get_mut(square.column as usize))
            {
                *cell = Some(piece.clone());
            }
        }
        BoardSnapshot { squares }
    }
}
