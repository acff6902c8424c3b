//! Session Directory - Game Session Registry for Matchmaking Nodes
//!
//! Tracks the game sessions hosted by one server node, hands out short
//! shareable game codes that are unique across the cluster, and answers
//! matchmaking queries for public sessions waiting for players.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Session Registry                               │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌───────────────────────┐  │
//! │  │  Create / Remove │  │   Find / Require │  │  ListPublicWaiting    │  │
//! │  │  (claim+rollback)│  │   (local lookup) │  │  (lazy, bounded scan) │  │
//! │  └────────┬─────────┘  └────────┬─────────┘  └───────────┬───────────┘  │
//! │           │                     │                        │              │
//! │           └─────────────────────┼────────────────────────┘              │
//! │                                 │                                       │
//! │                   ┌─────────────┴─────────────┐                         │
//! │                   │  Local sessions (DashMap) │                         │
//! │                   │  code -> Reserved | Live  │                         │
//! │                   └─────────────┬─────────────┘                         │
//! ├─────────────────────────────────┼───────────────────────────────────────┤
//! │   Code Generator                │         Node Directory (port)         │
//! │  ┌──────────────────────┐       │       ┌───────────────────────────┐   │
//! │  │ 4-letter / 6-letter  │───────┴──────▶│ code -> owning node addr  │   │
//! │  │ GameCode <-> display │               │ (memory adapter included) │   │
//! │  └──────────────────────┘               └───────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`code`]: Game codes, display rendering, and candidate code sources
//! - [`registry`]: Session registry, sessions, discovery, and events
//! - [`directory`]: Node Directory adapters
//! - [`domain`]: Game attributes and port definitions
//! - [`config`]: Server configuration
//! - [`error`]: Error types and handling

pub mod code;
pub mod config;
pub mod directory;
pub mod domain;
pub mod error;
pub mod registry;

// Re-export commonly used types
pub use code::{CodeLength, CodeSource, CodeSourceRef, GameCode, RandomCodeSource, SequenceCodeSource};

pub use config::ServerConfig;

pub use directory::{MemoryNodeDirectory, MemoryNodeDirectoryConfig};

pub use domain::game::{GameKeywords, GameOptions, MapId, SessionState};
pub use domain::ports::{NodeDirectory, NodeDirectoryRef};

pub use error::{Error, Result};

pub use registry::{
    GameSession, ListingQuery, Listings, RegistryStats, RegistryStatsSnapshot, SessionEvent,
    SessionRegistry,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
