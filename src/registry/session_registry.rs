//! Session Registry
//!
//! Concurrent map from game code to session for the sessions hosted by this
//! node. A code is claimed twice on creation: locally (insert-if-absent in
//! the map) and cluster-wide (insert-if-absent in the Node Directory). Either
//! both claims hold or neither survives the call.

use crate::code::{CodeSourceRef, GameCode, RandomCodeSource};
use crate::config::ServerConfig;
use crate::domain::game::GameOptions;
use crate::domain::ports::NodeDirectoryRef;
use crate::error::{Error, Result};
use crate::registry::events::SessionEvent;
use crate::registry::listing::{ListingQuery, Listings};
use crate::registry::session::GameSession;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

// =============================================================================
// Registry Slot
// =============================================================================

/// State of one code in the local map
#[derive(Debug, Clone)]
pub(crate) enum Slot {
    /// Held locally while the cluster claim is in flight
    Reserved,
    /// Claimed locally and cluster-wide
    Live(Arc<GameSession>),
}

impl Slot {
    fn session(&self) -> Option<&Arc<GameSession>> {
        match self {
            Slot::Live(session) => Some(session),
            Slot::Reserved => None,
        }
    }
}

/// Why a single candidate code could not be claimed
enum ClaimError {
    /// Code taken locally or by another node; another candidate may succeed
    Collision(String),
    /// Node Directory failed or timed out
    Directory(Error),
}

// =============================================================================
// Registry Statistics
// =============================================================================

/// Registry counters, aligned to prevent false sharing
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct RegistryStats {
    /// Sessions currently live
    pub live_sessions: AtomicU64,
    /// Successful creations
    pub created: AtomicU64,
    /// Removals of live sessions
    pub removed: AtomicU64,
    /// Create calls that returned an error
    pub creation_failures: AtomicU64,
    /// Candidate codes rejected as already taken
    pub code_collisions: AtomicU64,
    /// Failed or timed-out Node Directory calls
    pub directory_errors: AtomicU64,
}

impl RegistryStats {
    /// Create a snapshot of current stats
    pub fn snapshot(&self) -> RegistryStatsSnapshot {
        RegistryStatsSnapshot {
            live_sessions: self.live_sessions.load(Ordering::Relaxed),
            created: self.created.load(Ordering::Relaxed),
            removed: self.removed.load(Ordering::Relaxed),
            creation_failures: self.creation_failures.load(Ordering::Relaxed),
            code_collisions: self.code_collisions.load(Ordering::Relaxed),
            directory_errors: self.directory_errors.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of registry statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStatsSnapshot {
    pub live_sessions: u64,
    pub created: u64,
    pub removed: u64,
    pub creation_failures: u64,
    pub code_collisions: u64,
    pub directory_errors: u64,
}

// =============================================================================
// Session Registry
// =============================================================================

/// Directory of the sessions hosted by this node
pub struct SessionRegistry {
    /// Local claims
    sessions: DashMap<GameCode, Slot>,
    /// Cluster-wide claims
    directory: NodeDirectoryRef,
    /// Candidate code generator
    code_source: CodeSourceRef,
    /// Configuration
    config: ServerConfig,
    /// Address recorded as owner in the Node Directory
    public_addr: SocketAddr,
    /// Counters
    stats: RegistryStats,
    /// Event broadcaster
    event_sender: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("public_addr", &self.public_addr)
            .field("directory", &self.directory.backend_name())
            .field("live_sessions", &self.len())
            .finish()
    }
}

impl SessionRegistry {
    /// Create a registry drawing random codes
    pub fn new(config: ServerConfig, directory: NodeDirectoryRef) -> Result<Arc<Self>> {
        Self::with_code_source(config, directory, Arc::new(RandomCodeSource))
    }

    /// Create a registry drawing candidate codes from `code_source`
    pub fn with_code_source(
        config: ServerConfig,
        directory: NodeDirectoryRef,
        code_source: CodeSourceRef,
    ) -> Result<Arc<Self>> {
        config.validate()?;

        let (event_sender, _) = broadcast::channel(config.event_channel_capacity);
        let public_addr = config.public_endpoint();

        info!(
            public_addr = %public_addr,
            directory = directory.backend_name(),
            code_length = %config.code_length,
            "Session registry initialized"
        );

        Ok(Arc::new(Self {
            sessions: DashMap::new(),
            directory,
            code_source,
            config,
            public_addr,
            stats: RegistryStats::default(),
            event_sender,
        }))
    }

    /// Get an event receiver
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_sender.subscribe()
    }

    fn emit_event(&self, event: SessionEvent) {
        let _ = self.event_sender.send(event);
    }

    /// Address this node records in the Node Directory
    pub fn public_addr(&self) -> SocketAddr {
        self.public_addr
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Create a session with a fresh code claimed locally and cluster-wide
    ///
    /// Tries up to `max_create_attempts` candidate codes. Collisions move on
    /// to the next candidate; a Node Directory failure or timeout ends the
    /// call. The claim sequence runs on its own task, so dropping the
    /// returned future never interrupts a rollback.
    pub async fn create(self: &Arc<Self>, options: GameOptions) -> Result<Arc<GameSession>> {
        let registry = Arc::clone(self);
        tokio::spawn(async move { registry.create_detached(options).await })
            .await
            .map_err(|e| Error::Internal(format!("session creation task failed: {}", e)))?
    }

    async fn create_detached(self: Arc<Self>, options: GameOptions) -> Result<Arc<GameSession>> {
        let max_attempts = self.config.max_create_attempts;
        let mut last_reason = String::from("no attempt made");

        for attempt in 1..=max_attempts {
            let code = self.code_source.next_code(self.config.code_length);

            match self.claim(code, &options).await {
                Ok(session) => {
                    self.stats.created.fetch_add(1, Ordering::Relaxed);
                    self.emit_event(SessionEvent::SessionCreated {
                        code: code.raw(),
                        display_code: session.display_code().to_string(),
                        attempts: attempt,
                    });
                    debug!(
                        code = %session.display_code(),
                        raw = code.raw(),
                        attempt,
                        "Created session"
                    );
                    return Ok(session);
                }
                Err(ClaimError::Collision(reason)) => {
                    self.stats.code_collisions.fetch_add(1, Ordering::Relaxed);
                    self.emit_event(SessionEvent::CodeCollision {
                        display_code: code.to_display(),
                    });
                    debug!(code = %code, attempt, reason = %reason, "Code collision");
                    last_reason = reason;
                }
                Err(ClaimError::Directory(err)) => {
                    self.stats.directory_errors.fetch_add(1, Ordering::Relaxed);
                    return Err(self.creation_failed(attempt, err.to_string()));
                }
            }
        }

        Err(self.creation_failed(max_attempts, last_reason))
    }

    fn creation_failed(&self, attempts: u32, reason: String) -> Error {
        self.stats.creation_failures.fetch_add(1, Ordering::Relaxed);
        self.emit_event(SessionEvent::CreationFailed {
            attempts,
            reason: reason.clone(),
        });
        warn!(attempts, reason = %reason, "Failed to create session");
        Error::CreationFailed { attempts, reason }
    }

    /// Claim `code` locally, then cluster-wide; undo the local claim if the
    /// cluster claim does not hold
    async fn claim(
        self: &Arc<Self>,
        code: GameCode,
        options: &GameOptions,
    ) -> std::result::Result<Arc<GameSession>, ClaimError> {
        let session = Arc::new(GameSession::new(
            Arc::downgrade(self),
            self.directory.clone(),
            self.public_addr,
            code,
            options.clone(),
        ));
        let display_code = session.display_code().to_string();

        match self.sessions.entry(code) {
            Entry::Occupied(_) => {
                return Err(ClaimError::Collision(format!(
                    "code {} already in use on this node",
                    display_code
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(Slot::Reserved);
            }
        }

        let timeout = self.config.directory_timeout();
        let claimed = tokio::time::timeout(
            timeout,
            self.directory.try_claim(&display_code, self.public_addr),
        )
        .await;

        match claimed {
            Ok(Ok(true)) => {
                self.stats.live_sessions.fetch_add(1, Ordering::Relaxed);
                self.sessions.insert(code, Slot::Live(Arc::clone(&session)));
                Ok(session)
            }
            Ok(Ok(false)) => {
                self.drop_reservation(code);
                Err(ClaimError::Collision(format!(
                    "code {} claimed by another node",
                    display_code
                )))
            }
            Ok(Err(err)) => {
                self.drop_reservation(code);
                Err(ClaimError::Directory(err))
            }
            Err(_) => {
                // The claim may have landed after the deadline. The
                // reservation stays until the release has run.
                self.release_claim(&display_code).await;
                self.drop_reservation(code);
                Err(ClaimError::Directory(Error::NodeDirectoryTimeout {
                    operation: "claim".into(),
                    timeout,
                }))
            }
        }
    }

    fn drop_reservation(&self, code: GameCode) {
        self.sessions
            .remove_if(&code, |_, slot| matches!(slot, Slot::Reserved));
    }

    /// Release this node's cluster claim on `display_code`, bounded by the
    /// directory timeout. Failures are logged, never returned.
    async fn release_claim(&self, display_code: &str) {
        let timeout = self.config.directory_timeout();
        let reason = match tokio::time::timeout(
            timeout,
            self.directory.release(display_code, self.public_addr),
        )
        .await
        {
            Ok(Ok(released)) => {
                debug!(code = %display_code, released, "Released cluster claim");
                return;
            }
            Ok(Err(err)) => err.to_string(),
            Err(_) => Error::NodeDirectoryTimeout {
                operation: "release".into(),
                timeout,
            }
            .to_string(),
        };

        self.stats.directory_errors.fetch_add(1, Ordering::Relaxed);
        self.emit_event(SessionEvent::ClaimReleaseFailed {
            display_code: display_code.to_string(),
            reason: reason.clone(),
        });
        warn!(code = %display_code, reason = %reason, "Failed to release cluster claim");
    }

    /// Look up a live session on this node
    pub fn find(&self, code: GameCode) -> Option<Arc<GameSession>> {
        self.sessions
            .get(&code)
            .and_then(|slot| slot.session().cloned())
    }

    /// Look up a live session by its display code
    pub fn find_by_display(&self, display: &str) -> Result<Option<Arc<GameSession>>> {
        Ok(self.find(GameCode::from_display(display)?))
    }

    /// Look up a live session, treating a miss as an error
    pub fn require(&self, code: GameCode) -> Result<Arc<GameSession>> {
        self.find(code).ok_or_else(|| Error::NotFound {
            code: code.to_display(),
        })
    }

    /// Remove a session and release its cluster claim
    ///
    /// Idempotent. The cluster claim is released even when the session is
    /// not present locally; a code whose creation is still in flight is left
    /// to its creator. The code stays reserved locally until the release has
    /// run, so a create of the same code cannot go live in between.
    /// Directory failures are logged and do not fail the call.
    pub async fn remove(self: &Arc<Self>, code: GameCode) {
        let display_code = code.to_display();

        match self.sessions.entry(code) {
            Entry::Occupied(mut slot) => {
                if matches!(slot.get(), Slot::Reserved) {
                    debug!(code = %display_code, "Code reserved by another operation, not removing");
                    return;
                }
                slot.insert(Slot::Reserved);
                self.stats.live_sessions.fetch_sub(1, Ordering::Relaxed);
                self.stats.removed.fetch_add(1, Ordering::Relaxed);
                self.emit_event(SessionEvent::SessionRemoved {
                    code: code.raw(),
                    display_code: display_code.clone(),
                });
                debug!(code = %display_code, raw = code.raw(), "Removed session");
            }
            Entry::Vacant(slot) => {
                slot.insert(Slot::Reserved);
                debug!(code = %display_code, "Session not present locally, releasing cluster claim");
            }
        }

        let registry = Arc::clone(self);
        let release = tokio::spawn(async move {
            registry.release_claim(&display_code).await;
            registry.drop_reservation(code);
        });
        if let Err(e) = release.await {
            warn!(error = %e, "Cluster claim release task failed");
        }
    }

    /// Remove every live session, releasing their cluster claims
    ///
    /// Returns the number of sessions removed.
    pub async fn drain(self: &Arc<Self>) -> usize {
        let codes = self.codes();
        for code in &codes {
            self.remove(*code).await;
        }
        info!(count = codes.len(), "Drained session registry");
        codes.len()
    }

    /// List public sessions waiting for players that match `query`
    ///
    /// The scan is lazy and stops after `query.limit` matches. Each call
    /// starts a fresh scan of the current sessions.
    pub fn list_public_waiting(&self, query: ListingQuery) -> Listings<'_> {
        Listings::new(self.sessions.iter(), query, self.config.room_capacity)
    }

    /// Codes of all live sessions
    pub fn codes(&self) -> Vec<GameCode> {
        self.sessions
            .iter()
            .filter(|r| r.value().session().is_some())
            .map(|r| *r.key())
            .collect()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.stats.live_sessions.load(Ordering::Relaxed) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStatsSnapshot {
        self.stats.snapshot()
    }
}
