//! Board and related things

use crate::moves::{Move, MoveKind};
use crate::types::{Color, File, Piece, PieceKind, Rank, Square};

use std::fmt::{self, Display};

/// An 8x8 board: a mapping from squares to pieces.
///
/// The board is pure data with value semantics. [`Board::with_move_applied`]
/// returns a fresh board and never mutates the receiver, which is what makes
/// legality simulation and undo safe: no piece value is ever shared between
/// two boards.
///
/// Invariants: at most one piece per square, and a piece's `square` field
/// always equals the square it is stored under.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
}

impl Board {
    /// Returns a board with no pieces on it.
    pub const fn empty() -> Board {
        Board {
            squares: [None; 64],
        }
    }

    /// Returns a board with the standard initial position.
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for file in File::iter() {
            res.put(Piece::new(
                PieceKind::Pawn,
                Color::White,
                Square::from_parts(file, Rank::R2),
            ));
            res.put(Piece::new(
                PieceKind::Pawn,
                Color::Black,
                Square::from_parts(file, Rank::R7),
            ));
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            for (file, kind) in [
                (File::A, PieceKind::Rook),
                (File::B, PieceKind::Knight),
                (File::C, PieceKind::Bishop),
                (File::D, PieceKind::Queen),
                (File::E, PieceKind::King),
                (File::F, PieceKind::Bishop),
                (File::G, PieceKind::Knight),
                (File::H, PieceKind::Rook),
            ] {
                res.put(Piece::new(kind, color, Square::from_parts(file, rank)));
            }
        }
        res
    }

    /// Returns the piece on square `sq`, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// Puts `piece` on the square its `square` field names, replacing
    /// whatever stood there.
    #[inline]
    pub fn put(&mut self, piece: Piece) {
        self.squares[piece.square.index()] = Some(piece);
    }

    /// Removes and returns the piece on `sq`.
    #[inline]
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()].take()
    }

    /// Iterates over all pieces on the board.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.squares.iter().filter_map(|p| *p)
    }

    /// Iterates over all pieces of color `color`.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |p| p.color == color)
    }

    /// Returns the square of the king of color `color`.
    ///
    /// A validated game position always has exactly one; `None` can only
    /// come out of a hand-built board.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|p| p.kind == PieceKind::King)
            .map(|p| p.square)
    }

    /// Returns a new board with `mv` applied, including the move's side
    /// effects: the captured pawn removed on en passant, the rook
    /// relocated on castling, the pawn substituted on promotion.
    ///
    /// # Panics
    ///
    /// Panics if there is no piece on the move's source square (or no rook
    /// on a castling move's rook square). Both are programming errors:
    /// every upstream path validates the move against this board first.
    pub fn with_move_applied(&self, mv: &Move) -> Board {
        let mut next = self.clone();
        let piece = match next.remove(mv.src()) {
            Some(p) => p,
            None => panic!("no piece to move on {}", mv.src()),
        };
        debug_assert_eq!(piece.square, mv.src());
        match mv.kind() {
            MoveKind::Normal | MoveKind::DoubleStep | MoveKind::Capture(_) => {
                next.put(piece.moved_to(mv.dst()));
            }
            MoveKind::EnPassant { captured_square } => {
                next.remove(captured_square);
                next.put(piece.moved_to(mv.dst()));
            }
            MoveKind::Castle { rook_src, rook_dst } => {
                let rook = match next.remove(rook_src) {
                    Some(r) => r,
                    None => panic!("no rook to castle with on {}", rook_src),
                };
                next.put(rook.moved_to(rook_dst));
                next.put(piece.moved_to(mv.dst()));
            }
            MoveKind::Promotion { kind, .. } => {
                next.put(Piece {
                    kind,
                    ..piece.moved_to(mv.dst())
                });
            }
        }
        next
    }

    /// Wraps the board to allow pretty-printing.
    ///
    /// The wrapper implements [`fmt::Display`] and draws an ASCII diagram
    /// with rank 8 on top:
    ///
    /// ```
    /// # use heronchess::Board;
    /// #
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    ///  |abcdefgh
    /// "#;
    /// assert_eq!(Board::initial().pretty().to_string().trim(), res.trim());
    /// ```
    pub fn pretty(&self) -> Pretty<'_> {
        Pretty { board: self }
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::empty()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Board(\n{})", self.pretty())
    }
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in (0..8).rev().map(Rank::from_index) {
            write!(f, "{}|", rank)?;
            for file in File::iter() {
                let c = self
                    .board
                    .piece_at(Square::from_parts(file, rank))
                    .map(|p| p.as_char())
                    .unwrap_or('.');
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "-+--------")?;
        write!(f, " |")?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}
