//! Game Code Module
//!
//! Short numeric session codes and their human-shareable letter rendering.
//! Codes come in two display formats: the legacy four-letter format and the
//! six-letter format built on a scrambled alphabet.

pub mod game_code;
pub mod source;

pub use game_code::*;
pub use source::*;
