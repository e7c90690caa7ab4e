//! # Base types for heronchess
//!
//! This is an auxiliary crate for `heronchess`, which contains the core value
//! types (squares, colors, pieces) and the movement geometry constants shared
//! by the main crate, its tests and its benches.
//!
//! Normally you don't want to use this crate directly. Use `heronchess`
//! instead.

pub mod geometry;
pub mod types;

pub use types::{Color, File, Piece, PieceKind, Rank, Square, SquareParseError};
