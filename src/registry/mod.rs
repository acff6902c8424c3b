//! Session Registry Module
//!
//! Concurrent directory of the live game sessions hosted by this node, with
//! cluster-wide code uniqueness enforced through the Node Directory and lazy
//! matchmaking discovery over the live sessions.

pub mod events;
pub mod listing;
pub mod session;
pub mod session_registry;

pub use events::*;
pub use listing::*;
pub use session::*;
pub use session_registry::*;
