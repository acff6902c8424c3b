//! Domain layer - Core game types and port definitions
//!
//! This module defines the matchmaking attributes sessions carry and the
//! traits (ports) that cluster adapters implement, following hexagonal
//! architecture principles.

pub mod game;
pub mod ports;

pub use game::*;
pub use ports::*;
