// =============================================================================
// Move generation
//
// Every piece kind is handled by one function below. Generation is pure: it
// reads the piece, the two occupancy maps and the board bounds, and returns a
// map from landing square to the Move that gets there. Nothing is stored on
// the piece between calls.
//
// Coordinate system: row 0 = first player's back rank, column 0 = file a.
// =============================================================================

use std::collections::{HashMap, HashSet};

use crate::moves::{Action, Move};
use crate::piece::{Piece, PieceKind, PieceMap};
use crate::position::Position;

/// A unit step on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const STRAIGHT: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// (row, column) delta. "Up" means toward higher rows.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Up => (1, 0),
            Direction::Down => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::UpLeft => (1, -1),
            Direction::UpRight => (1, 1),
            Direction::DownLeft => (-1, -1),
            Direction::DownRight => (-1, 1),
        }
    }
}

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

/// Castling landing columns: (king, rook) when the rook sits right of the king.
const KINGSIDE_LANDING: (i32, i32) = (6, 5);
/// Castling landing columns: (king, rook) when the rook sits left of the king.
const QUEENSIDE_LANDING: (i32, i32) = (2, 3);

/// What a piece sees of the board while generating moves.
struct View<'v, 'p> {
    friendlies: &'v PieceMap<'p>,
    opponents: &'v PieceMap<'p>,
    n_row: i32,
    n_column: i32,
}

impl View<'_, '_> {
    fn in_bounds(&self, position: Position) -> bool {
        position.is_in_bounds(self.n_row, self.n_column)
    }

    fn is_empty(&self, position: Position) -> bool {
        !self.friendlies.contains_key(&position) && !self.opponents.contains_key(&position)
    }

    /// A displacement onto an empty square or a capture of an opponent.
    /// `None` when a friendly piece stands on `to`.
    fn landing(&self, piece: &Piece, to: Position) -> Option<Move> {
        if self.friendlies.contains_key(&to) {
            return None;
        }
        let from = piece.position();
        Some(match self.opponents.get(&to) {
            Some(victim) => Move::capture(piece.id(), from, to, victim.id()),
            None => Move::displacement(piece.id(), from, to),
        })
    }
}

/// Entry point used by `Piece::moves`.
pub fn moves(
    piece: &Piece,
    friendlies: &PieceMap,
    n_row: i32,
    n_column: i32,
    opponents: &PieceMap,
) -> HashMap<Position, Move> {
    let mut moves = HashMap::new();
    if n_row == 0 && n_column == 0 {
        return moves;
    }
    if !piece.position().is_in_bounds(n_row, n_column) {
        return moves;
    }

    let view = View {
        friendlies,
        opponents,
        n_row,
        n_column,
    };
    match piece.kind() {
        PieceKind::Rook => cast_rays(piece, &view, &Direction::STRAIGHT, &mut moves),
        PieceKind::Bishop => cast_rays(piece, &view, &Direction::DIAGONAL, &mut moves),
        PieceKind::Queen => cast_rays(piece, &view, &Direction::ALL, &mut moves),
        PieceKind::Knight => step_moves(piece, &view, &KNIGHT_OFFSETS, &mut moves),
        PieceKind::King => king_moves(piece, &view, &mut moves),
        PieceKind::Pawn => pawn_moves(piece, &view, &mut moves),
    }
    moves
}

// =============================================================================
// Shared toolkit
// =============================================================================

/// Walk each ray to the board edge. A friendly piece stops the ray before its
/// square, an opponent stops it on its square with a capture.
fn cast_rays(
    piece: &Piece,
    view: &View,
    directions: &[Direction],
    moves: &mut HashMap<Position, Move>,
) {
    for direction in directions {
        let (dr, dc) = direction.offset();
        let mut to = piece.position().offset(dr, dc);
        while view.in_bounds(to) {
            match view.landing(piece, to) {
                None => break,
                Some(mv) => {
                    let is_capture = view.opponents.contains_key(&to);
                    moves.insert(to, mv);
                    if is_capture {
                        break;
                    }
                }
            }
            to = to.offset(dr, dc);
        }
    }
}

/// Fixed single jumps, each landing independently.
fn step_moves(
    piece: &Piece,
    view: &View,
    offsets: &[(i32, i32)],
    moves: &mut HashMap<Position, Move>,
) {
    for &(dr, dc) in offsets {
        let to = piece.position().offset(dr, dc);
        if !view.in_bounds(to) {
            continue;
        }
        if let Some(mv) = view.landing(piece, to) {
            moves.insert(to, mv);
        }
    }
}

// =============================================================================
// King
// =============================================================================

fn king_moves(king: &Piece, view: &View, moves: &mut HashMap<Position, Move>) {
    let threatened = threatened_positions(king, view);

    for direction in Direction::ALL {
        let (dr, dc) = direction.offset();
        let to = king.position().offset(dr, dc);
        if !view.in_bounds(to) || threatened.contains(&to) {
            continue;
        }
        if let Some(mv) = view.landing(king, to) {
            moves.insert(to, mv);
        }
    }

    castling_moves(king, view, &threatened, moves);
}

/// Squares any opponent could move to next turn. The king is lifted off the
/// board for this, so sliding attacks run through its square.
fn threatened_positions(king: &Piece, view: &View) -> HashSet<Position> {
    let own = lift(view.friendlies, king.position());
    let theirs = lift(view.opponents, king.position());

    let mut threatened = HashSet::new();
    for opponent in theirs.values() {
        let reachable = opponent.moves(&theirs, view.n_row, view.n_column, &own);
        threatened.extend(reachable.into_keys());
    }
    threatened
}

/// Copy of `map` without whatever stands on `square`.
fn lift<'p>(map: &PieceMap<'p>, square: Position) -> PieceMap<'p> {
    map.iter()
        .filter(|(position, _)| **position != square)
        .map(|(position, piece)| (*position, *piece))
        .collect()
}

fn castling_moves(
    king: &Piece,
    view: &View,
    threatened: &HashSet<Position>,
    moves: &mut HashMap<Position, Move>,
) {
    if king.n_moves() != 0 || threatened.contains(&king.position()) {
        return;
    }

    let from = king.position();
    for corner_column in [0, view.n_column - 1] {
        if corner_column == from.column {
            continue;
        }
        let corner = Position::new(from.row, corner_column);
        let rook = match view.friendlies.get(&corner) {
            Some(rook) if rook.kind() == PieceKind::Rook && rook.n_moves() == 0 => *rook,
            _ => continue,
        };
        if !path_is_clear(view, from, corner) {
            continue;
        }

        let (king_column, rook_column) = if corner_column > from.column {
            KINGSIDE_LANDING
        } else {
            QUEENSIDE_LANDING
        };
        let king_to = Position::new(from.row, king_column);
        let rook_to = Position::new(from.row, rook_column);
        let vacant = |to: Position| {
            view.in_bounds(to) && (view.is_empty(to) || to == from || to == corner)
        };
        if !vacant(king_to) || !vacant(rook_to) {
            continue;
        }
        if threatened.contains(&king_to) || threatened.contains(&rook_to) {
            continue;
        }

        moves.entry(king_to).or_insert_with(|| {
            Move::swap(
                Action::new(king.id(), from, king_to),
                Action::new(rook.id(), corner, rook_to),
            )
        });
    }
}

/// True when no piece of either side stands strictly between `a` and `b` on one row.
fn path_is_clear(view: &View, a: Position, b: Position) -> bool {
    let (low, high) = if a.column < b.column {
        (a.column, b.column)
    } else {
        (b.column, a.column)
    };
    ((low + 1)..high).all(|column| view.is_empty(Position::new(a.row, column)))
}

// =============================================================================
// Pawn
// =============================================================================

/// Forward pushes never capture; diagonals only capture. No en passant and
/// no promotion.
fn pawn_moves(pawn: &Piece, view: &View, moves: &mut HashMap<Position, Move>) {
    let forward = pawn.side().map_or(1, |side| side.forward());
    let from = pawn.position();

    let reach = if pawn.n_moves() == 0 { 2 } else { 1 };
    let mut to = from;
    for _ in 0..reach {
        to = to.offset(forward, 0);
        if !view.in_bounds(to) || !view.is_empty(to) {
            break;
        }
        moves.insert(to, Move::displacement(pawn.id(), from, to));
    }

    for dc in [-1, 1] {
        let to = from.offset(forward, dc);
        if !view.in_bounds(to) {
            continue;
        }
        if let Some(victim) = view.opponents.get(&to) {
            moves.insert(to, Move::capture(pawn.id(), from, to, victim.id()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveType;
    use crate::piece::PieceId;
    use crate::player::{Player, Side};

    fn at(row: i32, column: i32) -> Position {
        Position::new(row, column)
    }

    fn piece(kind: PieceKind, row: i32, column: i32, id: usize) -> Piece {
        Piece::new(kind, at(row, column)).with_id(PieceId(id))
    }

    fn map(pieces: &[Piece]) -> PieceMap<'_> {
        pieces.iter().map(|p| (p.position(), p)).collect()
    }

    fn generate(mover: &Piece, friends: &[Piece], foes: &[Piece]) -> HashMap<Position, Move> {
        mover.moves(&map(friends), 8, 8, &map(foes))
    }

    fn moved(mut p: Piece) -> Piece {
        let square = p.position();
        p.relocate(square);
        p
    }

    #[test]
    fn direction_offsets_are_unit_steps() {
        for direction in Direction::ALL {
            let (dr, dc) = direction.offset();
            assert!(dr.abs() <= 1 && dc.abs() <= 1 && (dr, dc) != (0, 0));
        }
        assert_eq!(Direction::Up.offset(), (1, 0));
        assert_eq!(Direction::DownRight.offset(), (-1, 1));
    }

    /// A lone rook reaches every other square of its row and column.
    #[test]
    fn rook_on_empty_board() {
        let rook = piece(PieceKind::Rook, 3, 3, 0);
        let moves = generate(&rook, &[], &[]);
        assert_eq!(moves.len(), 14);
        for (to, mv) in &moves {
            assert!(to.row == 3 || to.column == 3);
            assert_eq!(mv.move_type(), MoveType::Displacement);
            assert_eq!(mv.actions().len(), 1);
            assert_eq!(mv.destination(), Some(*to));
        }
    }

    #[test]
    fn opponent_on_ray_becomes_capture_and_blocks() {
        let rook = piece(PieceKind::Rook, 3, 3, 0);
        let foe = piece(PieceKind::Pawn, 3, 6, 1);
        let moves = generate(&rook, &[], std::slice::from_ref(&foe));
        assert_eq!(moves.len(), 13);
        let capture = &moves[&at(3, 6)];
        assert_eq!(capture.move_type(), MoveType::Capture);
        assert_eq!(capture.actions().len(), 2);
        assert_eq!(capture.actions()[1].piece().unwrap(), PieceId(1));
        assert!(capture.actions()[1].to().is_nowhere());
        assert!(!moves.contains_key(&at(3, 7)));
    }

    #[test]
    fn friendly_on_ray_blocks_without_capture() {
        let rook = piece(PieceKind::Rook, 3, 3, 0);
        let friend = piece(PieceKind::Pawn, 3, 6, 1);
        let moves = generate(&rook, &[friend], &[]);
        assert_eq!(moves.len(), 12);
        assert!(!moves.contains_key(&at(3, 6)));
        assert!(!moves.contains_key(&at(3, 7)));
        assert!(moves.values().all(|mv| mv.move_type() == MoveType::Displacement));
    }

    #[test]
    fn bishop_and_queen_rays() {
        let bishop = piece(PieceKind::Bishop, 3, 3, 0);
        let moves = generate(&bishop, &[], &[]);
        assert_eq!(moves.len(), 13);
        assert!(moves.keys().all(|to| (to.row - 3).abs() == (to.column - 3).abs()));

        let queen = piece(PieceKind::Queen, 3, 3, 0);
        assert_eq!(generate(&queen, &[], &[]).len(), 27);

        let corner_queen = piece(PieceKind::Queen, 0, 0, 0);
        assert_eq!(generate(&corner_queen, &[], &[]).len(), 21);
    }

    #[test]
    fn knight_jumps() {
        let corner = piece(PieceKind::Knight, 0, 0, 0);
        let moves = generate(&corner, &[], &[]);
        let mut targets: Vec<Position> = moves.keys().copied().collect();
        targets.sort();
        assert_eq!(targets, vec![at(1, 2), at(2, 1)]);

        let centre = piece(PieceKind::Knight, 3, 3, 0);
        assert_eq!(generate(&centre, &[], &[]).len(), 8);

        // Jumps over blockers, skips friends, captures foes.
        let blockers = [piece(PieceKind::Pawn, 3, 4, 1), piece(PieceKind::Pawn, 5, 4, 2)];
        let foe = piece(PieceKind::Bishop, 1, 2, 3);
        let moves = generate(&centre, &blockers, &[foe]);
        assert_eq!(moves.len(), 7);
        assert_eq!(moves[&at(1, 2)].move_type(), MoveType::Capture);
        assert!(!moves.contains_key(&at(5, 4)));
    }

    #[test]
    fn lone_king_steps_everywhere() {
        let king = piece(PieceKind::King, 3, 3, 0);
        let moves = generate(&king, &[], &[]);
        assert_eq!(moves.len(), 8);
        assert!(moves.values().all(|mv| mv.move_type() == MoveType::Displacement));
    }

    #[test]
    fn king_avoids_threatened_squares() {
        let king = piece(PieceKind::King, 3, 3, 0);
        let rook = piece(PieceKind::Rook, 4, 0, 1);
        let moves = generate(&king, &[], &[rook]);
        assert_eq!(moves.len(), 5);
        for column in 2..=4 {
            assert!(!moves.contains_key(&at(4, column)));
        }
    }

    /// The king does not shield the squares behind it from a slider.
    #[test]
    fn king_cannot_retreat_along_attacking_ray() {
        let king = piece(PieceKind::King, 3, 3, 0);
        let rook = piece(PieceKind::Rook, 3, 0, 1);
        let moves = generate(&king, &[], &[rook]);
        assert!(!moves.contains_key(&at(3, 2)));
        assert!(!moves.contains_key(&at(3, 4)));
        assert_eq!(moves.len(), 6);
    }

    #[test]
    fn king_captures_unprotected_neighbour() {
        let king = piece(PieceKind::King, 3, 3, 0);
        let knight = piece(PieceKind::Knight, 4, 4, 1);
        let moves = generate(&king, &[], &[knight]);
        let capture = &moves[&at(4, 4)];
        assert_eq!(capture.move_type(), MoveType::Capture);
        assert_eq!(capture.actions()[1].piece().unwrap(), PieceId(1));
    }

    fn castling_setup() -> (Piece, Vec<Piece>) {
        let king = piece(PieceKind::King, 0, 4, 4);
        let rooks = vec![
            piece(PieceKind::Rook, 0, 0, 0),
            piece(PieceKind::Rook, 0, 7, 7),
            king.clone(),
        ];
        (king, rooks)
    }

    #[test]
    fn king_castles_both_ways() {
        let (king, friends) = castling_setup();
        let moves = generate(&king, &friends, &[]);
        assert_eq!(moves.len(), 7);

        let kingside = &moves[&at(0, 6)];
        assert_eq!(kingside.move_type(), MoveType::Swap);
        assert_eq!(kingside.actions().len(), 2);
        assert_eq!(kingside.actions()[0].piece().unwrap(), PieceId(4));
        assert_eq!(kingside.actions()[1].piece().unwrap(), PieceId(7));
        assert_eq!(kingside.actions()[1].from(), at(0, 7));
        assert_eq!(kingside.actions()[1].to(), at(0, 5));

        let queenside = &moves[&at(0, 2)];
        assert_eq!(queenside.move_type(), MoveType::Swap);
        assert_eq!(queenside.actions()[1].from(), at(0, 0));
        assert_eq!(queenside.actions()[1].to(), at(0, 3));
    }

    #[test]
    fn castling_needs_a_clear_path() {
        let (king, mut friends) = castling_setup();
        friends.push(piece(PieceKind::Knight, 0, 1, 1));
        let moves = generate(&king, &friends, &[]);
        assert!(!moves.contains_key(&at(0, 2)));
        assert_eq!(moves[&at(0, 6)].move_type(), MoveType::Swap);

        let foes = [piece(PieceKind::Bishop, 0, 5, 9)];
        let (king, friends) = castling_setup();
        let moves = generate(&king, &friends, &foes);
        assert!(moves
            .get(&at(0, 6))
            .map_or(true, |mv| mv.move_type() != MoveType::Swap));
    }

    #[test]
    fn castling_refused_into_threat() {
        let (king, friends) = castling_setup();
        let foes = [piece(PieceKind::Rook, 5, 6, 9)];
        let moves = generate(&king, &friends, &foes);
        assert!(!moves.contains_key(&at(0, 6)));
        assert_eq!(moves[&at(0, 2)].move_type(), MoveType::Swap);

        // The rook's landing square counts too.
        let foes = [piece(PieceKind::Rook, 5, 3, 9)];
        let moves = generate(&king, &friends, &foes);
        assert!(!moves.contains_key(&at(0, 2)));
        assert!(moves.contains_key(&at(0, 6)));
    }

    #[test]
    fn castling_refused_out_of_check() {
        let (king, friends) = castling_setup();
        let foes = [piece(PieceKind::Rook, 5, 4, 9)];
        let moves = generate(&king, &friends, &foes);
        assert!(moves.values().all(|mv| mv.move_type() != MoveType::Swap));
    }

    #[test]
    fn castling_refused_after_moving() {
        let (king, friends) = castling_setup();
        let moves = generate(&moved(king.clone()), &friends, &[]);
        assert!(moves.values().all(|mv| mv.move_type() != MoveType::Swap));

        let friends = vec![
            moved(piece(PieceKind::Rook, 0, 0, 0)),
            piece(PieceKind::Rook, 0, 7, 7),
            king.clone(),
        ];
        let moves = generate(&king, &friends, &[]);
        assert!(!moves.contains_key(&at(0, 2)));
        assert_eq!(moves[&at(0, 6)].move_type(), MoveType::Swap);
    }

    #[test]
    fn pawn_first_move_reaches_two_squares() {
        let pawn = piece(PieceKind::Pawn, 1, 3, 0);
        let moves = generate(&pawn, &[], &[]);
        let mut targets: Vec<Position> = moves.keys().copied().collect();
        targets.sort();
        assert_eq!(targets, vec![at(2, 3), at(3, 3)]);

        let moves = generate(&moved(pawn.clone()), &[], &[]);
        assert_eq!(moves.keys().copied().collect::<Vec<_>>(), vec![at(2, 3)]);
    }

    #[test]
    fn pawn_push_is_blocked_by_any_piece() {
        let pawn = piece(PieceKind::Pawn, 1, 3, 0);
        let near = [piece(PieceKind::Knight, 2, 3, 1)];
        assert!(generate(&pawn, &[], &near).is_empty());
        assert!(generate(&pawn, &near, &[]).is_empty());

        let far = [piece(PieceKind::Knight, 3, 3, 1)];
        let moves = generate(&pawn, &[], &far);
        assert_eq!(moves.keys().copied().collect::<Vec<_>>(), vec![at(2, 3)]);
    }

    #[test]
    fn pawn_captures_only_diagonally() {
        let pawn = piece(PieceKind::Pawn, 1, 3, 0);
        let foes = [piece(PieceKind::Rook, 2, 4, 1)];
        let friends = [piece(PieceKind::Rook, 2, 2, 2)];
        let moves = generate(&pawn, &friends, &foes);
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[&at(2, 4)].move_type(), MoveType::Capture);
        assert!(!moves.contains_key(&at(2, 2)));
    }

    #[test]
    fn second_side_pawn_moves_toward_row_zero() {
        let pawn = piece(PieceKind::Pawn, 6, 3, 0).with_owner(Player::new("bob", Side::Second));
        let foes = [piece(PieceKind::Knight, 5, 2, 1)];
        let moves = generate(&pawn, &[], &foes);
        let mut targets: Vec<Position> = moves.keys().copied().collect();
        targets.sort();
        assert_eq!(targets, vec![at(4, 3), at(5, 2), at(5, 3)]);
    }

    #[test]
    fn pawn_on_last_row_is_stuck() {
        let pawn = moved(piece(PieceKind::Pawn, 7, 3, 0));
        assert!(generate(&pawn, &[], &[]).is_empty());
    }
}
