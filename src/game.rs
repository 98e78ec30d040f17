use tracing::info;

use crate::board::{Board, BoardSnapshot};
use crate::config::GameConfig;
use crate::error::{ChessError, ChessResult};
use crate::moves::Move;
use crate::piece::{Piece, PieceId};
use crate::player::{Player, Side};
use crate::position::Position;
use crate::status::Status;

/// Turn orchestration on top of a `Board`.
///
/// A game is empty until `start`; afterwards every successful move hands
/// the turn to the other player.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    player1: Option<Player>,
    player2: Option<Player>,
    current: Option<Side>,
    board: Option<Board>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Game {
            config,
            player1: None,
            player2: None,
            current: None,
            board: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn start(&mut self, name1: &str, name2: &str) -> ChessResult<()> {
        if self.board.is_some() {
            return Err(ChessError::invalid_state("The game has already been started."));
        }
        self.config.validate()?;

        let player1 = Player::new(name1, Side::First);
        let player2 = Player::new(name2, Side::Second);
        let mut board = Board::new(self.config.rows, self.config.columns);
        board.initialize(&player1, &player2)?;
        info!(
            player1 = name1,
            player2 = name2,
            rows = self.config.rows,
            columns = self.config.columns,
            "game started"
        );

        self.player1 = Some(player1);
        self.player2 = Some(player2);
        self.current = Some(Side::First);
        self.board = Some(board);
        Ok(())
    }

    pub fn status(&self) -> Status {
        self.board
            .as_ref()
            .map_or(Status::NotStarted, Board::status)
    }

    /// Move the current player's piece standing on `from` to `to`, then pass the turn.
    pub fn make_move(&mut self, from: Position, to: Position) -> ChessResult<BoardSnapshot> {
        if self.board.is_none() {
            return Err(ChessError::invalid_state("The game has not started yet."));
        }
        let id = self.find_piece(from)?;
        let board = self.board_mut()?;
        board.move_piece(id, to)?;
        let snapshot = board.serialize();
        self.next_player();
        Ok(snapshot)
    }

    /// Take back the latest move and give the turn back to its author.
    pub fn undo(&mut self) -> ChessResult<Move> {
        let mv = self.board_mut()?.undo_move()?;
        self.next_player();
        Ok(mv)
    }

    pub fn redo(&mut self) -> ChessResult<Move> {
        let mv = self.board_mut()?.redo_move()?;
        self.next_player();
        Ok(mv)
    }

    /// Squares the current player's piece on `from` can reach, sorted.
    pub fn destinations(&self, from: Position) -> ChessResult<Vec<Position>> {
        let id = self.find_piece(from)?;
        let mut squares: Vec<Position> = self.board_ref()?.moves_for(id)?.into_keys().collect();
        squares.sort();
        Ok(squares)
    }

    /// Every move the current player can make.
    pub fn legal_moves(&self) -> ChessResult<Vec<Move>> {
        let side = self.current_player()?.side();
        self.board_ref()?.moves_for_side(side)
    }

    pub fn board(&self) -> ChessResult<BoardSnapshot> {
        Ok(self.board_ref()?.serialize())
    }

    pub fn player1(&self) -> ChessResult<&Player> {
        self.player1
            .as_ref()
            .ok_or_else(|| ChessError::uninitialized("Player1"))
    }

    pub fn player2(&self) -> ChessResult<&Player> {
        self.player2
            .as_ref()
            .ok_or_else(|| ChessError::uninitialized("Player2"))
    }

    pub fn current_player(&self) -> ChessResult<&Player> {
        match self.current {
            Some(Side::First) => self.player1(),
            Some(Side::Second) => self.player2(),
            None => Err(ChessError::uninitialized("CurrentPlayer")),
        }
    }

    fn board_ref(&self) -> ChessResult<&Board> {
        self.board
            .as_ref()
            .ok_or_else(|| ChessError::uninitialized("Board"))
    }

    fn board_mut(&mut self) -> ChessResult<&mut Board> {
        self.board
            .as_mut()
            .ok_or_else(|| ChessError::uninitialized("Board"))
    }

    fn next_player(&mut self) {
        self.current = self.current.map(|side| side.opposite());
    }

    fn find_piece(&self, at: Position) -> ChessResult<PieceId> {
        let player = self.current_player()?;
        self.board_ref()?
            .active_pieces()
            .find(|piece| piece.position() == at && piece.side() == Some(player.side()))
            .map(Piece::id)
            .ok_or_else(|| {
                ChessError::not_found(format!(
                    "Can't find a Piece owned by {player} at Position '{at}'."
                ))
            })
    }
}
