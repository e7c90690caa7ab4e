//! Move generation: per-kind movement templates, special moves and the
//! legality filter.
//!
//! Generation happens in two stages. The templates produce pseudo-legal
//! moves: consistent with the piece's movement pattern and the board
//! occupancy, but blind to whether the mover's own king ends up attacked.
//! [`legal_moves`] then applies each candidate to a scratch board and
//! discards the ones that leave the king in check. That simulate-then-check
//! pass is the single source of truth for legality; there are no pin
//! shortcuts to diverge from it.

use crate::attack::is_square_attacked;
use crate::board::Board;
use crate::game::GameState;
use crate::geometry;
use crate::moves::{Move, MoveKind, PROMOTION_KINDS};
use crate::types::{Color, File, Piece, PieceKind, Square};

use std::slice;

use arrayvec::ArrayVec;
use derive_more::{Deref, DerefMut};

/// A list of moves, backed by a fixed-capacity buffer.
#[derive(Default, Debug, Clone, Eq, PartialEq, Deref, DerefMut)]
pub struct MoveList(ArrayVec<Move, 256>);

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Generates the pseudo-legal moves of the piece on `from`.
///
/// Returns an empty list when the square is empty. The result may still
/// contain moves that expose the mover's own king; see [`legal_moves`].
pub fn pseudo_legal(state: &GameState, from: Square) -> MoveList {
    let mut res = MoveList::new();
    if let Some(piece) = state.board().piece_at(from) {
        pseudo_legal_into(state, piece, &mut res);
    }
    res
}

/// Generates the legal moves of the piece on `from`, regardless of whose
/// turn it is.
pub fn legal_moves(state: &GameState, from: Square) -> MoveList {
    let mut res = pseudo_legal(state, from);
    let board = state.board();
    res.retain(|mv| is_legal(board, mv));
    res
}

/// Returns `true` if any piece of `color` has at least one legal move.
///
/// Stops at the first hit, so mate and stalemate queries don't pay for
/// full generation.
pub fn has_any_legal_move(state: &GameState, color: Color) -> bool {
    let board = state.board();
    let mut buf = MoveList::new();
    for piece in board.pieces_of(color) {
        buf.clear();
        pseudo_legal_into(state, piece, &mut buf);
        if buf.iter().any(|mv| is_legal(board, mv)) {
            return true;
        }
    }
    false
}

/// The authoritative legality test: apply the move to a scratch board and
/// verify the mover's king is not attacked on the result.
pub(crate) fn is_legal(board: &Board, mv: &Move) -> bool {
    let next = board.with_move_applied(mv);
    let king = next.king_square(mv.side()).unwrap();
    !is_square_attacked(&next, king, mv.side().inv())
}

fn pseudo_legal_into(state: &GameState, piece: Piece, out: &mut MoveList) {
    match piece.kind {
        PieceKind::Rook => gen_sliding(state.board(), piece, &geometry::ORTHOGONAL_DIRS, out),
        PieceKind::Bishop => gen_sliding(state.board(), piece, &geometry::DIAGONAL_DIRS, out),
        PieceKind::Queen => {
            gen_sliding(state.board(), piece, &geometry::ORTHOGONAL_DIRS, out);
            gen_sliding(state.board(), piece, &geometry::DIAGONAL_DIRS, out);
        }
        PieceKind::Knight => gen_jumps(state.board(), piece, &geometry::KNIGHT_JUMPS, out),
        PieceKind::King => {
            gen_jumps(state.board(), piece, &geometry::KING_STEPS, out);
            gen_castling(state, piece, out);
        }
        PieceKind::Pawn => gen_pawn(state, piece, out),
    }
}

fn gen_sliding(board: &Board, piece: Piece, dirs: &[(isize, isize)], out: &mut MoveList) {
    for &(df, dr) in dirs {
        let mut sq = piece.square;
        while let Some(next) = sq.try_shift(df, dr) {
            match board.piece_at(next) {
                None => {
                    out.push(Move::new(piece.square, next, MoveKind::Normal, piece.color));
                    sq = next;
                }
                Some(other) => {
                    if other.color != piece.color {
                        out.push(Move::new(
                            piece.square,
                            next,
                            MoveKind::Capture(other),
                            piece.color,
                        ));
                    }
                    break;
                }
            }
        }
    }
}

fn gen_jumps(board: &Board, piece: Piece, offsets: &[(isize, isize)], out: &mut MoveList) {
    for &(df, dr) in offsets {
        if let Some(next) = piece.square.try_shift(df, dr) {
            match board.piece_at(next) {
                None => out.push(Move::new(piece.square, next, MoveKind::Normal, piece.color)),
                Some(other) if other.color != piece.color => out.push(Move::new(
                    piece.square,
                    next,
                    MoveKind::Capture(other),
                    piece.color,
                )),
                Some(_) => {}
            }
        }
    }
}

fn gen_pawn(state: &GameState, piece: Piece, out: &mut MoveList) {
    let board = state.board();
    let fwd = geometry::pawn_forward_delta(piece.color);

    if let Some(one) = piece.square.try_shift(0, fwd) {
        if board.piece_at(one).is_none() {
            push_pawn_advance(piece, one, None, out);
            if !piece.has_moved {
                if let Some(two) = one.try_shift(0, fwd) {
                    if board.piece_at(two).is_none() {
                        out.push(Move::new(
                            piece.square,
                            two,
                            MoveKind::DoubleStep,
                            piece.color,
                        ));
                    }
                }
            }
        }
    }

    for &df in &geometry::PAWN_CAPTURE_FILES {
        if let Some(dst) = piece.square.try_shift(df, fwd) {
            match board.piece_at(dst) {
                Some(other) if other.color != piece.color => {
                    push_pawn_advance(piece, dst, Some(other), out);
                }
                Some(_) => {}
                None => gen_en_passant(state, piece, dst, out),
            }
        }
    }
}

/// Pushes a pawn advance or capture to `dst`, fanning out into the four
/// promotion variants when `dst` lies on the last rank.
fn push_pawn_advance(piece: Piece, dst: Square, captured: Option<Piece>, out: &mut MoveList) {
    if dst.rank() == geometry::promotion_rank(piece.color) {
        for kind in PROMOTION_KINDS {
            out.push(Move::new(
                piece.square,
                dst,
                MoveKind::Promotion { kind, captured },
                piece.color,
            ));
        }
    } else {
        let kind = match captured {
            Some(other) => MoveKind::Capture(other),
            None => MoveKind::Normal,
        };
        out.push(Move::new(piece.square, dst, kind, piece.color));
    }
}

/// En passant hangs off history, not the board alone: it is open exactly
/// when the immediately preceding move was an opposing double step landing
/// next to this pawn on its fifth rank. Any intervening move closes it.
fn gen_en_passant(state: &GameState, piece: Piece, dst: Square, out: &mut MoveList) {
    let last = match state.last_move() {
        Some(last) => last,
        None => return,
    };
    if !matches!(last.kind(), MoveKind::DoubleStep) || last.side() != piece.color.inv() {
        return;
    }
    if piece.square.rank() != geometry::en_passant_rank(piece.color) {
        return;
    }
    if last.dst().rank() == piece.square.rank() && last.dst().file() == dst.file() {
        out.push(Move::new(
            piece.square,
            dst,
            MoveKind::EnPassant {
                captured_square: last.dst(),
            },
            piece.color,
        ));
    }
}

struct CastleLane {
    rook_file: File,
    /// Squares strictly between king and rook; all must be empty.
    between: &'static [File],
    /// Square the king crosses; must not be attacked. The destination is
    /// vetted by the legality filter like any other king move.
    crossed: File,
    king_dst: File,
    rook_dst: File,
}

const CASTLE_LANES: [CastleLane; 2] = [
    // kingside
    CastleLane {
        rook_file: File::H,
        between: &[File::F, File::G],
        crossed: File::F,
        king_dst: File::G,
        rook_dst: File::F,
    },
    // queenside
    CastleLane {
        rook_file: File::A,
        between: &[File::B, File::C, File::D],
        crossed: File::D,
        king_dst: File::C,
        rook_dst: File::D,
    },
];

fn gen_castling(state: &GameState, king: Piece, out: &mut MoveList) {
    let rank = geometry::home_rank(king.color);
    if king.has_moved || king.square != Square::from_parts(File::E, rank) {
        return;
    }
    let board = state.board();
    let opponent = king.color.inv();
    if is_square_attacked(board, king.square, opponent) {
        return;
    }
    for lane in &CASTLE_LANES {
        let rook_src = Square::from_parts(lane.rook_file, rank);
        let rook_ok = match board.piece_at(rook_src) {
            Some(r) => r.kind == PieceKind::Rook && r.color == king.color && !r.has_moved,
            None => false,
        };
        if !rook_ok {
            continue;
        }
        if lane
            .between
            .iter()
            .any(|&f| board.piece_at(Square::from_parts(f, rank)).is_some())
        {
            continue;
        }
        if is_square_attacked(board, Square::from_parts(lane.crossed, rank), opponent) {
            continue;
        }
        out.push(Move::new(
            king.square,
            Square::from_parts(lane.king_dst, rank),
            MoveKind::Castle {
                rook_src,
                rook_dst: Square::from_parts(lane.rook_dst, rank),
            },
            king.color,
        ));
    }
}
