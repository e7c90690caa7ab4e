//! The move model: tagged move variants with explicit side effects, plus
//! the minimal wire form collaborators exchange over a transport.

use crate::types::{Color, Piece, PieceKind, Square, SquareParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Replacement kinds a promoting pawn may turn into, in the order the
/// generator emits them.
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

/// Move kind
///
/// Every side effect of a move beyond "the mover changes square" is carried
/// explicitly in the variant payload, so applying a move needs no lookups
/// into history.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Plain relocation to an empty square
    Normal,
    /// Pawn two-square advance; recorded so the reply can be checked for
    /// en passant
    DoubleStep,
    /// Capture of the piece standing on the destination
    Capture(Piece),
    /// En passant capture; the captured pawn does not stand on the
    /// destination square
    EnPassant { captured_square: Square },
    /// Castling; the rook relocates in the same move
    Castle { rook_src: Square, rook_dst: Square },
    /// Pawn promotion, capturing when `captured` is set
    Promotion {
        kind: PieceKind,
        captured: Option<Piece>,
    },
}

/// A move of `side` from `src` to `dst`.
///
/// Moves are pure value objects produced by the move generator; creating
/// or holding one never touches a board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    src: Square,
    dst: Square,
    kind: MoveKind,
    side: Color,
}

impl Move {
    pub(crate) const fn new(src: Square, dst: Square, kind: MoveKind, side: Color) -> Move {
        Move {
            src,
            dst,
            kind,
            side,
        }
    }

    pub const fn src(&self) -> Square {
        self.src
    }

    pub const fn dst(&self) -> Square {
        self.dst
    }

    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    pub const fn side(&self) -> Color {
        self.side
    }

    /// Returns `true` if the move removes an opposing piece.
    pub const fn is_capture(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture(_)
                | MoveKind::EnPassant { .. }
                | MoveKind::Promotion {
                    captured: Some(_),
                    ..
                }
        )
    }

    /// The replacement kind if this move is a promotion.
    pub const fn promotion(&self) -> Option<PieceKind> {
        match self.kind {
            MoveKind::Promotion { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Long-algebraic form (`e2e4`, `e7e8q`); castling renders as the
    /// king's own two-square move. This is the notation stored in the
    /// game history.
    pub fn notation(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(kind) = self.promotion() {
            write!(f, "{}", kind.as_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

/// Error parsing a [`MoveRequest`] from its wire form
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(SquareParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(SquareParseError),
    /// Bad promotion character
    #[error("bad promotion char {0:?}")]
    BadPromotion(char),
}

/// The minimal `(from, to, promotion?)` form of a move.
///
/// This is what a transport or UI layer submits; the engine reconciles it
/// against the current legal set via
/// [`GameState::resolve`](crate::game::GameState::resolve), rejecting it
/// when no legal move matches. A promoting request without an explicit
/// choice resolves to a queen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MoveRequest {
    pub src: Square,
    pub dst: Square,
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    pub const fn new(src: Square, dst: Square) -> MoveRequest {
        MoveRequest {
            src,
            dst,
            promotion: None,
        }
    }

    pub const fn promoting(src: Square, dst: Square, kind: PieceKind) -> MoveRequest {
        MoveRequest {
            src,
            dst,
            promotion: Some(kind),
        }
    }
}

impl From<&Move> for MoveRequest {
    fn from(mv: &Move) -> MoveRequest {
        MoveRequest {
            src: mv.src(),
            dst: mv.dst(),
            promotion: mv.promotion(),
        }
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.as_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for MoveRequest {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<MoveRequest, Self::Err> {
        if !matches!(s.len(), 4 | 5) {
            return Err(MoveParseError::BadLength);
        }
        let src = Square::from_str(&s[0..2]).map_err(MoveParseError::BadSrc)?;
        let dst = Square::from_str(&s[2..4]).map_err(MoveParseError::BadDst)?;
        let promotion = if s.len() == 5 {
            Some(match s.as_bytes()[4] {
                b'n' => PieceKind::Knight,
                b'b' => PieceKind::Bishop,
                b'r' => PieceKind::Rook,
                b'q' => PieceKind::Queen,
                b => return Err(MoveParseError::BadPromotion(b as char)),
            })
        } else {
            None
        };
        Ok(MoveRequest {
            src,
            dst,
            promotion,
        })
    }
}
