//! Game state: the unit of mutation exposed to collaborators.
//!
//! A [`GameState`] bundles a board, the side to move and the move history.
//! Applying a move never mutates the receiver: it hands back a fresh state,
//! so previous snapshots stay inspectable (undo, history display, and
//! "is this still the state I validated against" checks all fall out of
//! that).

use crate::attack::is_square_attacked;
use crate::board::Board;
use crate::movegen::{self, MoveList};
use crate::moves::{Move, MoveRequest, PROMOTION_KINDS};
use crate::trace::{TraceEvent, TraceSink};
use crate::types::{Color, PieceKind, Square};

use derive_more::Deref;
use thiserror::Error;

/// Error validating an injected position
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PositionError {
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// The side which is not to move is already in check
    #[error("opponent's king is attacked")]
    OpponentInCheck,
}

/// Error applying a move
///
/// All of these are recoverable: the submitted state is left untouched and
/// the caller may retry with a corrected move.
#[derive(Debug, Copy, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// There is no piece on the move's source square
    #[error("no piece on {0}")]
    NoPieceAtSquare(Square),
    /// The piece on the source square belongs to the side not on turn
    #[error("{0:?} is not on turn")]
    NotCurrentTurn(Color),
    /// The move is not in the current legal set
    #[error("move is not legal")]
    IllegalMove,
    /// A promotion was requested with a kind a pawn cannot become
    #[error("invalid promotion choice")]
    AmbiguousPromotionChoice,
}

/// One applied move together with its long-algebraic notation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    mv: Move,
    notation: String,
}

impl HistoryRecord {
    pub fn mv(&self) -> &Move {
        &self.mv
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }
}

/// The append-only record of applied moves.
///
/// Replaying it from the initial (or injected) position reconstructs the
/// current board exactly.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deref)]
pub struct History(Vec<HistoryRecord>);

/// A full game snapshot: board, side to move, history and the half-move
/// clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    turn: Color,
    history: History,
    /// Half-moves since the last pawn advance or capture. Not consumed by
    /// any rule yet; kept for draw-rule extensions.
    halfmove_clock: u16,
}

impl GameState {
    /// Returns the state at the start of a standard game.
    pub fn new() -> GameState {
        GameState::from_position(Board::initial(), Color::White).unwrap()
    }

    /// Wraps a hand-built position, validating it first.
    ///
    /// Exactly one king per side is required, and the side which is not to
    /// move must not already stand in check.
    pub fn from_position(board: Board, turn: Color) -> Result<GameState, PositionError> {
        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces_of(color)
                .filter(|p| p.kind == PieceKind::King)
                .count();
            if kings == 0 {
                return Err(PositionError::NoKing(color));
            }
            if kings > 1 {
                return Err(PositionError::TooManyKings(color));
            }
        }
        let opponent = turn.inv();
        let opponent_king = board.king_square(opponent).unwrap();
        if is_square_attacked(&board, opponent_king, turn) {
            return Err(PositionError::OpponentInCheck);
        }
        Ok(GameState {
            board,
            turn,
            history: History::default(),
            halfmove_clock: 0,
        })
    }

    /// Replays `moves` from the standard initial position.
    pub fn replay<'a, I>(moves: I) -> Result<GameState, MoveError>
    where
        I: IntoIterator<Item = &'a Move>,
    {
        let mut state = GameState::new();
        for mv in moves {
            state = state.apply_move(mv)?;
        }
        Ok(state)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// The most recently applied move, if any. This is what decides
    /// whether en passant is currently open.
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last().map(|r| r.mv())
    }

    /// Returns the legal moves of the piece on `from`.
    ///
    /// Empty when the square is empty or the piece belongs to the side not
    /// on turn.
    pub fn legal_moves_for(&self, from: Square) -> MoveList {
        match self.board.piece_at(from) {
            Some(piece) if piece.color == self.turn => movegen::legal_moves(self, from),
            _ => MoveList::new(),
        }
    }

    /// Same as [`GameState::legal_moves_for`], reporting the result to
    /// `sink`.
    pub fn legal_moves_for_traced(&self, from: Square, sink: &mut dyn TraceSink) -> MoveList {
        let moves = self.legal_moves_for(from);
        sink.on_event(TraceEvent::MovesGenerated {
            from,
            count: moves.len(),
        });
        moves
    }

    /// Applies `mv`, returning the successor state.
    ///
    /// The move must be present in the current legal set for its source
    /// square; otherwise the state is left untouched and an error comes
    /// back. Application is all-or-nothing.
    pub fn apply_move(&self, mv: &Move) -> Result<GameState, MoveError> {
        self.apply_move_traced(mv, &mut ())
    }

    /// Same as [`GameState::apply_move`], reporting the outcome to `sink`.
    pub fn apply_move_traced(
        &self,
        mv: &Move,
        sink: &mut dyn TraceSink,
    ) -> Result<GameState, MoveError> {
        match self.try_apply(mv) {
            Ok(next) => {
                sink.on_event(TraceEvent::MoveApplied {
                    mv: *mv,
                    by: self.turn,
                });
                Ok(next)
            }
            Err(error) => {
                sink.on_event(TraceEvent::MoveRejected {
                    from: mv.src(),
                    error,
                });
                Err(error)
            }
        }
    }

    fn try_apply(&self, mv: &Move) -> Result<GameState, MoveError> {
        let piece = self
            .board
            .piece_at(mv.src())
            .ok_or(MoveError::NoPieceAtSquare(mv.src()))?;
        if piece.color != self.turn {
            return Err(MoveError::NotCurrentTurn(piece.color));
        }
        if !self.legal_moves_for(mv.src()).contains(mv) {
            return Err(MoveError::IllegalMove);
        }

        let board = self.board.with_move_applied(mv);
        let halfmove_clock = if piece.kind == PieceKind::Pawn || mv.is_capture() {
            0
        } else {
            self.halfmove_clock + 1
        };
        let mut history = self.history.clone();
        history.0.push(HistoryRecord {
            mv: *mv,
            notation: mv.notation(),
        });
        Ok(GameState {
            board,
            turn: self.turn.inv(),
            history,
            halfmove_clock,
        })
    }

    /// Resolves a wire-form request against the current legal set.
    ///
    /// A promoting request without an explicit choice resolves to a queen;
    /// a choice outside the four promotable kinds is rejected outright.
    pub fn resolve(&self, req: &MoveRequest) -> Result<Move, MoveError> {
        if let Some(kind) = req.promotion {
            if !PROMOTION_KINDS.contains(&kind) {
                return Err(MoveError::AmbiguousPromotionChoice);
            }
        }
        let piece = self
            .board
            .piece_at(req.src)
            .ok_or(MoveError::NoPieceAtSquare(req.src))?;
        if piece.color != self.turn {
            return Err(MoveError::NotCurrentTurn(piece.color));
        }
        self.legal_moves_for(req.src)
            .iter()
            .find(|mv| {
                mv.dst() == req.dst
                    && match mv.promotion() {
                        Some(kind) => kind == req.promotion.unwrap_or(PieceKind::Queen),
                        None => req.promotion.is_none(),
                    }
            })
            .copied()
            .ok_or(MoveError::IllegalMove)
    }

    /// Resolves and applies a wire-form request in one step.
    pub fn apply(&self, req: &MoveRequest) -> Result<GameState, MoveError> {
        let mv = self.resolve(req)?;
        self.apply_move(&mv)
    }

    /// Returns `true` if the king of `color` is attacked.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.board.king_square(color) {
            Some(king) => is_square_attacked(&self.board, king, color.inv()),
            None => false,
        }
    }

    /// Returns `true` if any piece of `color` has a legal move.
    pub fn has_any_legal_move(&self, color: Color) -> bool {
        movegen::has_any_legal_move(self, color)
    }

    /// Checkmate: in check with no legal move across all pieces.
    pub fn is_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_any_legal_move(color)
    }

    /// Stalemate: not in check, yet no legal move across all pieces.
    pub fn is_stalemate(&self, color: Color) -> bool {
        !self.is_in_check(color) && !self.has_any_legal_move(color)
    }
}

impl Default for GameState {
    fn default() -> GameState {
        GameState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveKind;
    use crate::trace::RecordingSink;
    use crate::types::{File, Piece, Rank};

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sq(file: File, rank: Rank) -> Square {
        Square::from_parts(file, rank)
    }

    fn req(s: &str) -> MoveRequest {
        s.parse().unwrap()
    }

    fn play(state: GameState, moves: &[&str]) -> GameState {
        moves
            .iter()
            .fold(state, |st, s| st.apply(&req(s)).unwrap())
    }

    fn position(pieces: &[(PieceKind, Color, Square)], turn: Color) -> GameState {
        let mut b = Board::empty();
        for &(kind, color, square) in pieces {
            b.put(Piece::new(kind, color, square));
        }
        GameState::from_position(b, turn).unwrap()
    }

    #[test]
    fn test_turn_alternates() {
        let state = GameState::new();
        assert_eq!(state.turn(), Color::White);
        let state = state.apply(&req("e2e4")).unwrap();
        assert_eq!(state.turn(), Color::Black);
        let state = state.apply(&req("e7e5")).unwrap();
        assert_eq!(state.turn(), Color::White);
        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history()[0].notation(), "e2e4");
        assert_eq!(state.history()[1].notation(), "e7e5");
    }

    #[test]
    fn test_wrong_side_rejected() {
        let state = GameState::new();
        assert_eq!(
            state.apply(&req("e7e5")),
            Err(MoveError::NotCurrentTurn(Color::Black))
        );
        assert_eq!(
            state.apply(&req("e4e5")),
            Err(MoveError::NoPieceAtSquare(sq(File::E, Rank::R4)))
        );
    }

    #[test]
    fn test_illegal_move_leaves_state_unchanged() {
        let state = GameState::new();
        let before = state.clone();

        // e2e5 matches no movement template
        assert_eq!(state.apply(&req("e2e5")), Err(MoveError::IllegalMove));
        // a hand-crafted move object is vetted just the same
        let bogus = Move::new(
            sq(File::E, Rank::R2),
            sq(File::E, Rank::R5),
            MoveKind::Normal,
            Color::White,
        );
        assert_eq!(state.apply_move(&bogus), Err(MoveError::IllegalMove));

        assert_eq!(state, before);
    }

    #[test]
    fn test_fools_mate() {
        let state = play(GameState::new(), &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(state.is_in_check(Color::White));
        assert!(state.is_checkmate(Color::White));
        assert!(!state.is_stalemate(Color::White));
        assert!(!state.is_checkmate(Color::Black));
        for square in Square::iter() {
            assert!(state.legal_moves_for(square).is_empty());
        }
    }

    #[test]
    fn test_back_rank_mate() {
        let state = position(
            &[
                (PieceKind::King, Color::White, sq(File::G, Rank::R1)),
                (PieceKind::Pawn, Color::White, sq(File::F, Rank::R2)),
                (PieceKind::Pawn, Color::White, sq(File::G, Rank::R2)),
                (PieceKind::Pawn, Color::White, sq(File::H, Rank::R2)),
                (PieceKind::Rook, Color::Black, sq(File::A, Rank::R1)),
                (PieceKind::King, Color::Black, sq(File::B, Rank::R8)),
            ],
            Color::White,
        );
        assert!(state.is_in_check(Color::White));
        assert!(state.is_checkmate(Color::White));
        assert!(!state.has_any_legal_move(Color::White));
    }

    #[test]
    fn test_stalemate() {
        let state = position(
            &[
                (PieceKind::King, Color::Black, sq(File::A, Rank::R8)),
                (PieceKind::Queen, Color::White, sq(File::C, Rank::R7)),
                (PieceKind::King, Color::White, sq(File::B, Rank::R6)),
            ],
            Color::Black,
        );
        assert!(!state.is_in_check(Color::Black));
        assert!(state.is_stalemate(Color::Black));
        assert!(!state.is_checkmate(Color::Black));
    }

    #[test]
    fn test_check_is_not_mate_when_escapable() {
        let state = play(GameState::new(), &["e2e4", "f7f6", "d1h5"]);
        assert!(state.is_in_check(Color::Black));
        assert!(!state.is_checkmate(Color::Black));
        // g6 blocks; it is the only legal reply
        let state = state.apply(&req("g7g6")).unwrap();
        assert!(!state.is_in_check(Color::Black));
    }

    #[test]
    fn test_halfmove_clock() {
        let state = GameState::new();
        assert_eq!(state.halfmove_clock(), 0);
        let state = play(state, &["g1f3", "b8c6"]);
        assert_eq!(state.halfmove_clock(), 2);
        // a pawn advance resets it
        let state = state.apply(&req("e2e4")).unwrap();
        assert_eq!(state.halfmove_clock(), 0);
        let state = play(state, &["g8f6", "f3g5"]);
        assert_eq!(state.halfmove_clock(), 2);
        // a capture resets it
        let state = state.apply(&req("f6e4")).unwrap();
        assert_eq!(state.halfmove_clock(), 0);
    }

    #[test]
    fn test_replay_reconstructs_board() {
        let state = play(
            GameState::new(),
            &["e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "g8f6", "e1g1"],
        );
        let replayed =
            GameState::replay(state.history().iter().map(|r| r.mv())).unwrap();
        assert_eq!(replayed, state);
        assert_eq!(replayed.board(), state.board());
    }

    #[test]
    fn test_castling_through_wire_form() {
        let state = play(
            GameState::new(),
            &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "e1g1"],
        );
        let king = state.board().piece_at(sq(File::G, Rank::R1)).unwrap();
        let rook = state.board().piece_at(sq(File::F, Rank::R1)).unwrap();
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(rook.kind, PieceKind::Rook);
        assert_eq!(state.board().piece_at(sq(File::H, Rank::R1)), None);
        assert_eq!(state.history().last().unwrap().notation(), "e1g1");
    }

    #[test]
    fn test_promotion_choice_and_default() {
        let base = position(
            &[
                (PieceKind::Pawn, Color::White, sq(File::A, Rank::R7)),
                (PieceKind::King, Color::White, sq(File::E, Rank::R1)),
                (PieceKind::King, Color::Black, sq(File::E, Rank::R8)),
            ],
            Color::White,
        );

        // explicit choice is honored
        let state = base.apply(&req("a7a8n")).unwrap();
        assert_eq!(
            state.board().piece_at(sq(File::A, Rank::R8)).map(|p| p.kind),
            Some(PieceKind::Knight)
        );

        // no choice defaults to a queen
        let state = base.apply(&req("a7a8")).unwrap();
        assert_eq!(
            state.board().piece_at(sq(File::A, Rank::R8)).map(|p| p.kind),
            Some(PieceKind::Queen)
        );

        // a kind a pawn cannot become is rejected
        let bad = MoveRequest::promoting(sq(File::A, Rank::R7), sq(File::A, Rank::R8), PieceKind::King);
        assert_eq!(base.apply(&bad), Err(MoveError::AmbiguousPromotionChoice));

        // a promotion choice on a non-promoting move is not legal
        let bad = MoveRequest::promoting(sq(File::A, Rank::R7), sq(File::A, Rank::R8), PieceKind::Queen);
        assert!(base.apply(&bad).is_ok());
        let state = GameState::new();
        let bad = MoveRequest::promoting(sq(File::E, Rank::R2), sq(File::E, Rank::R4), PieceKind::Queen);
        assert_eq!(state.apply(&bad), Err(MoveError::IllegalMove));
    }

    #[test]
    fn test_from_position_validation() {
        let mut b = Board::empty();
        b.put(Piece::new(PieceKind::King, Color::White, sq(File::E, Rank::R1)));
        assert_eq!(
            GameState::from_position(b.clone(), Color::White),
            Err(PositionError::NoKing(Color::Black))
        );

        b.put(Piece::new(PieceKind::King, Color::Black, sq(File::E, Rank::R8)));
        assert!(GameState::from_position(b.clone(), Color::White).is_ok());

        b.put(Piece::new(PieceKind::King, Color::Black, sq(File::A, Rank::R8)));
        assert_eq!(
            GameState::from_position(b, Color::White),
            Err(PositionError::TooManyKings(Color::Black))
        );

        // opponent already in check: the position is not reachable
        let mut b = Board::empty();
        b.put(Piece::new(PieceKind::King, Color::White, sq(File::E, Rank::R1)));
        b.put(Piece::new(PieceKind::King, Color::Black, sq(File::E, Rank::R8)));
        b.put(Piece::new(PieceKind::Rook, Color::White, sq(File::E, Rank::R4)));
        assert_eq!(
            GameState::from_position(b, Color::White),
            Err(PositionError::OpponentInCheck)
        );
    }

    #[test]
    fn test_trace_events() {
        let mut sink = RecordingSink::default();
        let state = GameState::new();

        let moves = state.legal_moves_for_traced(sq(File::E, Rank::R2), &mut sink);
        assert_eq!(moves.len(), 2);

        let mv = state.resolve(&req("e2e4")).unwrap();
        let state = state.apply_move_traced(&mv, &mut sink).unwrap();
        let bogus = Move::new(
            sq(File::E, Rank::R4),
            sq(File::E, Rank::R6),
            MoveKind::Normal,
            Color::White,
        );
        let _ = state.apply_move_traced(&bogus, &mut sink);

        assert_eq!(
            sink.0,
            vec![
                TraceEvent::MovesGenerated {
                    from: sq(File::E, Rank::R2),
                    count: 2
                },
                TraceEvent::MoveApplied {
                    mv,
                    by: Color::White
                },
                TraceEvent::MoveRejected {
                    from: sq(File::E, Rank::R4),
                    error: MoveError::NotCurrentTurn(Color::White)
                },
            ]
        );
    }

    #[test]
    fn test_random_walk_invariants() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut state = GameState::new();

        for _ in 0..80 {
            let mover = state.turn();
            let mut candidates = Vec::new();
            for from in Square::iter() {
                candidates.extend(state.legal_moves_for(from).iter().copied());
            }
            if candidates.is_empty() {
                break;
            }
            let mv = candidates[rng.gen_range(0..candidates.len())];
            state = state.apply_move(&mv).unwrap();

            // the mover never leaves its own king attacked
            assert!(!state.is_in_check(mover));
            // both kings survive every move
            assert!(state.board().king_square(Color::White).is_some());
            assert!(state.board().king_square(Color::Black).is_some());
        }

        let replayed =
            GameState::replay(state.history().iter().map(|r| r.mv())).unwrap();
        assert_eq!(replayed.board(), state.board());
    }
}
