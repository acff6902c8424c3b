//! Session Discovery
//!
//! Lazy matchmaking query over the registry's live sessions. A listing scans
//! the registry only until `limit` matches have been produced.

use crate::code::GameCode;
use crate::domain::game::{GameKeywords, MapId, SessionState};
use crate::registry::session::GameSession;
use crate::registry::session_registry::Slot;
use std::sync::Arc;

/// Default number of sessions returned by one listing
pub const DEFAULT_LISTING_LIMIT: usize = 10;

// =============================================================================
// Listing Query
// =============================================================================

/// Matchmaking criteria for public session discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    /// Required map (`None` = any map)
    pub map_id: Option<MapId>,
    /// Required language tag
    pub keywords: GameKeywords,
    /// Required impostor count (0 = any)
    pub num_impostors: u8,
    /// Maximum number of sessions returned
    pub limit: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self::new(GameKeywords::default())
    }
}

impl ListingQuery {
    pub fn new(keywords: GameKeywords) -> Self {
        Self {
            map_id: None,
            keywords,
            num_impostors: 0,
            limit: DEFAULT_LISTING_LIMIT,
        }
    }

    pub fn with_map(mut self, map_id: MapId) -> Self {
        self.map_id = Some(map_id);
        self
    }

    pub fn with_impostors(mut self, num_impostors: u8) -> Self {
        self.num_impostors = num_impostors;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Check whether `session` is a public, joinable match for this query
    pub fn matches(&self, session: &GameSession, room_capacity: u8) -> bool {
        let options = session.options();
        let capacity = options.max_players.min(room_capacity) as u32;

        session.is_public()
            && session.state() == SessionState::NotStarted
            && !session.is_full(capacity)
            && options.keywords == self.keywords
            && self.map_id.map_or(true, |map| options.map_id == map)
            && (self.num_impostors == 0 || options.num_impostors == self.num_impostors)
    }
}

// =============================================================================
// Listings
// =============================================================================

/// Lazy iterator over the sessions matching a [`ListingQuery`]
///
/// Holds a read guard on the registry shard being scanned; do not keep it
/// alive across an `.await`.
pub struct Listings<'a> {
    entries: dashmap::iter::Iter<'a, GameCode, Slot>,
    query: ListingQuery,
    room_capacity: u8,
    remaining: usize,
}

impl<'a> Listings<'a> {
    pub(crate) fn new(
        entries: dashmap::iter::Iter<'a, GameCode, Slot>,
        query: ListingQuery,
        room_capacity: u8,
    ) -> Self {
        let remaining = query.limit;
        Self {
            entries,
            query,
            room_capacity,
            remaining,
        }
    }
}

impl Iterator for Listings<'_> {
    type Item = Arc<GameSession>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for entry in self.entries.by_ref() {
            if let Slot::Live(session) = entry.value() {
                if self.query.matches(session, self.room_capacity) {
                    self.remaining -= 1;
                    return Some(Arc::clone(session));
                }
            }
        }

        self.remaining = 0;
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
