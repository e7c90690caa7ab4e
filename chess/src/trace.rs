//! Injectable observability hook.
//!
//! The engine never logs through a global sink. Callers that want to watch
//! move generation and application pass a [`TraceSink`] into the `*_traced`
//! methods on [`GameState`](crate::game::GameState); everyone else gets the
//! unit sink `()` which compiles away.

use crate::game::MoveError;
use crate::moves::Move;
use crate::types::{Color, Square};

/// A structured event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A legal-move query finished for the piece on `from`.
    MovesGenerated { from: Square, count: usize },
    /// A move was validated and committed.
    MoveApplied { mv: Move, by: Color },
    /// A submitted move was rejected; the state is unchanged.
    MoveRejected { from: Square, error: MoveError },
}

/// A sink for [`TraceEvent`]s, handed in by the caller.
pub trait TraceSink {
    fn on_event(&mut self, event: TraceEvent);
}

/// The no-op sink.
impl TraceSink for () {
    fn on_event(&mut self, _event: TraceEvent) {}
}

/// Collects events into a `Vec`; mainly useful in tests and debugging
/// harnesses.
#[derive(Default, Debug, Clone)]
pub struct RecordingSink(pub Vec<TraceEvent>);

impl TraceSink for RecordingSink {
    fn on_event(&mut self, event: TraceEvent) {
        self.0.push(event);
    }
}
