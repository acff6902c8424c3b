//! Code Sources
//!
//! Where the registry draws candidate codes from. The default source is
//! random; a sequence source replays fixed candidates.

use crate::code::game_code::{CodeLength, GameCode};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Supplies candidate codes to the session registry
pub trait CodeSource: Send + Sync {
    /// Produce the next candidate code of the given length
    fn next_code(&self, length: CodeLength) -> GameCode;
}

/// Type alias for Arc'd CodeSource
pub type CodeSourceRef = Arc<dyn CodeSource>;

// =============================================================================
// Random Source
// =============================================================================

/// Uniformly random codes from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeSource;

impl CodeSource for RandomCodeSource {
    fn next_code(&self, length: CodeLength) -> GameCode {
        GameCode::generate(length)
    }
}

// =============================================================================
// Sequence Source
// =============================================================================

/// Replays a fixed list of codes, then repeats the last one
///
/// The requested length is ignored. An empty sequence falls back to random
/// generation.
#[derive(Debug, Default)]
pub struct SequenceCodeSource {
    queue: Mutex<VecDeque<GameCode>>,
    last: Mutex<Option<GameCode>>,
}

impl SequenceCodeSource {
    pub fn new(codes: impl IntoIterator<Item = GameCode>) -> Self {
        Self {
            queue: Mutex::new(codes.into_iter().collect()),
            last: Mutex::new(None),
        }
    }

    /// A source that always yields `code`
    pub fn repeating(code: GameCode) -> Self {
        Self::new([code])
    }
}

impl CodeSource for SequenceCodeSource {
    fn next_code(&self, length: CodeLength) -> GameCode {
        let mut last = self.last.lock();
        match self.queue.lock().pop_front() {
            Some(code) => {
                *last = Some(code);
                code
            }
            None => last.unwrap_or_else(|| GameCode::generate(length)),
        }
    }
}
