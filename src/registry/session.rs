//! Game Session
//!
//! The registry's view of one game room. Identity and matchmaking options are
//! fixed at creation; visibility, player count and lifecycle state are driven
//! by the game-state machine through the setters.

use crate::code::GameCode;
use crate::domain::game::{GameOptions, SessionState};
use crate::domain::ports::NodeDirectoryRef;
use crate::error::Result;
use crate::registry::session_registry::SessionRegistry;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Weak;

/// A game session owned by exactly one registry entry
pub struct GameSession {
    /// Numeric code (registry key)
    code: GameCode,
    /// Rendered display code
    display_code: String,
    /// Public address of the node hosting this session
    host_node: SocketAddr,
    /// Matchmaking options
    options: GameOptions,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Listed in public discovery
    public: AtomicBool,
    /// Connected players
    player_count: AtomicU32,
    /// Lifecycle state
    state: RwLock<SessionState>,
    /// Owning registry
    registry: Weak<SessionRegistry>,
    /// Cluster directory the code is claimed in
    directory: NodeDirectoryRef,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("code", &self.display_code)
            .field("host_node", &self.host_node)
            .field("state", &self.state())
            .field("public", &self.is_public())
            .field("player_count", &self.player_count())
            .finish()
    }
}

impl GameSession {
    /// Create a new session; it starts private, not started and empty
    pub fn new(
        registry: Weak<SessionRegistry>,
        directory: NodeDirectoryRef,
        host_node: SocketAddr,
        code: GameCode,
        options: GameOptions,
    ) -> Self {
        Self {
            code,
            display_code: code.to_display(),
            host_node,
            options,
            created_at: Utc::now(),
            public: AtomicBool::new(false),
            player_count: AtomicU32::new(0),
            state: RwLock::new(SessionState::NotStarted),
            registry,
            directory,
        }
    }

    #[inline]
    pub fn code(&self) -> GameCode {
        self.code
    }

    #[inline]
    pub fn display_code(&self) -> &str {
        &self.display_code
    }

    #[inline]
    pub fn host_node(&self) -> SocketAddr {
        self.host_node
    }

    #[inline]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.public.load(Ordering::Acquire)
    }

    pub fn set_public(&self, public: bool) {
        self.public.store(public, Ordering::Release);
    }

    #[inline]
    pub fn player_count(&self) -> u32 {
        self.player_count.load(Ordering::Acquire)
    }

    pub fn set_player_count(&self, count: u32) {
        self.player_count.store(count, Ordering::Release);
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    pub fn set_state(&self, state: SessionState) {
        *self.state.write() = state;
    }

    /// Check if the session holds at least `capacity` players
    pub fn is_full(&self, capacity: u32) -> bool {
        self.player_count() >= capacity
    }

    /// Mark the session ended and retire it from its registry
    ///
    /// Does nothing beyond the state change if the registry is gone.
    pub async fn end(&self) {
        self.set_state(SessionState::Ended);
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.code).await;
        }
    }

    /// Resolve the node currently owning this session's code in the cluster
    pub async fn owner(&self) -> Result<Option<SocketAddr>> {
        self.directory.find(&self.display_code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryNodeDirectory;
    use crate::domain::game::GameKeywords;
    use crate::domain::ports::NodeDirectory;
    use std::sync::Arc;

    fn detached_session(directory: NodeDirectoryRef) -> GameSession {
        GameSession::new(
            Weak::new(),
            directory,
            "127.0.0.1:22023".parse().unwrap(),
            GameCode::from_display("REDSUS").unwrap(),
            GameOptions {
                keywords: GameKeywords::English,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_new_session_defaults() {
        let session = detached_session(Arc::new(MemoryNodeDirectory::new()));

        assert_eq!(session.display_code(), "REDSUS");
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(!session.is_public());
        assert_eq!(session.player_count(), 0);
        assert_eq!(session.options().keywords, GameKeywords::English);
    }

    #[test]
    fn test_setters() {
        let session = detached_session(Arc::new(MemoryNodeDirectory::new()));

        session.set_public(true);
        session.set_player_count(10);
        session.set_state(SessionState::Active);

        assert!(session.is_public());
        assert!(session.is_full(10));
        assert!(!session.is_full(11));
        assert_eq!(session.state(), SessionState::Active);
    }

    #[tokio::test]
    async fn test_end_without_registry_only_changes_state() {
        let session = detached_session(Arc::new(MemoryNodeDirectory::new()));
        session.end().await;
        assert_eq!(session.state(), SessionState::Ended);
    }

    #[tokio::test]
    async fn test_owner_reads_directory() {
        let directory = Arc::new(MemoryNodeDirectory::new());
        let session = detached_session(directory.clone());
        assert_eq!(session.owner().await.unwrap(), None);

        directory
            .save("REDSUS", session.host_node())
            .await
            .unwrap();
        assert_eq!(session.owner().await.unwrap(), Some(session.host_node()));
    }
}
