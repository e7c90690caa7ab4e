//! # heronchess
//!
//! A chess rules engine: board representation, per-piece move generation,
//! attack and check detection, special moves (castling, en passant,
//! promotion) and game-state bookkeeping.
//!
//! The crate deliberately stops at the rules. There is no search, no
//! notation import beyond the minimal wire form, and no I/O: presentation
//! and transport layers drive the engine through [`GameState`] and get
//! value-semantic snapshots back.
//!
//! # Example
//!
//! ```
//! use heronchess::{Color, GameState, MoveRequest};
//!
//! let state = GameState::new();
//! let state = state.apply(&"e2e4".parse::<MoveRequest>().unwrap()).unwrap();
//! assert_eq!(state.turn(), Color::Black);
//! assert!(!state.is_in_check(Color::Black));
//! ```

pub use heronchess_base::{geometry, types};

pub mod attack;
pub mod board;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod trace;

pub use board::Board;
pub use game::{GameState, History, HistoryRecord, MoveError, PositionError};
pub use movegen::MoveList;
pub use moves::{Move, MoveKind, MoveParseError, MoveRequest};
pub use heronchess_base::types::{Color, File, Piece, PieceKind, Rank, Square};
