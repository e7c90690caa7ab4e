//! Attack detection: whether a square is covered by pieces of one side.
//!
//! Everything here is pure and board-only. History is never consulted, so
//! this module alone cannot answer en passant legality; the move generator
//! owns that.

use crate::board::Board;
use crate::geometry;
use crate::types::{Color, PieceKind, Square};

/// Returns `true` if `target` is attacked by at least one piece of color
/// `by` on `board`.
///
/// Walks the eight rays outward from `target`; the first occupied square
/// on a ray decides it (rook/queen on orthogonals, bishop/queen on
/// diagonals, king only when it stands exactly one step away). Knight
/// jumps and the two pawn-attack squares are checked directly. King
/// adjacency is a plain distance-1 test, never a recursion into king move
/// generation, so two facing kings cannot re-check each other forever.
pub fn is_square_attacked(board: &Board, target: Square, by: Color) -> bool {
    for &(df, dr) in &geometry::ORTHOGONAL_DIRS {
        if ray_hits(board, target, df, dr, by, PieceKind::Rook) {
            return true;
        }
    }
    for &(df, dr) in &geometry::DIAGONAL_DIRS {
        if ray_hits(board, target, df, dr, by, PieceKind::Bishop) {
            return true;
        }
    }

    for &(df, dr) in &geometry::KNIGHT_JUMPS {
        if let Some(sq) = target.try_shift(df, dr) {
            if let Some(p) = board.piece_at(sq) {
                if p.color == by && p.kind == PieceKind::Knight {
                    return true;
                }
            }
        }
    }

    // A pawn of `by` attacks `target` from one rank behind it, seen from
    // the attacker's side.
    let dr = -geometry::pawn_forward_delta(by);
    for &df in &geometry::PAWN_CAPTURE_FILES {
        if let Some(sq) = target.try_shift(df, dr) {
            if let Some(p) = board.piece_at(sq) {
                if p.color == by && p.kind == PieceKind::Pawn {
                    return true;
                }
            }
        }
    }

    false
}

fn ray_hits(
    board: &Board,
    from: Square,
    df: isize,
    dr: isize,
    by: Color,
    slider: PieceKind,
) -> bool {
    let mut sq = from;
    let mut steps = 0;
    while let Some(next) = sq.try_shift(df, dr) {
        steps += 1;
        match board.piece_at(next) {
            None => sq = next,
            Some(p) => {
                return p.color == by
                    && (p.kind == slider
                        || p.kind == PieceKind::Queen
                        || (p.kind == PieceKind::King && steps == 1));
            }
        }
    }
    false
}
