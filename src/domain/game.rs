//! Game Domain Types
//!
//! Matchmaking attributes and lifecycle state of a game session.

use serde::{Deserialize, Serialize};

// =============================================================================
// Keywords
// =============================================================================

/// Language tag a session is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum GameKeywords {
    All = 0,
    #[default]
    Other = 1,
    SpanishLA = 2,
    Korean = 4,
    Russian = 8,
    Portuguese = 16,
    Arabic = 32,
    Filipino = 64,
    Polish = 128,
    English = 256,
    Japanese = 512,
    SpanishEU = 1024,
    Brazilian = 2048,
    Dutch = 4096,
    French = 8192,
    German = 16384,
    Italian = 32768,
    Chinese = 65536,
}

impl GameKeywords {
    const ALL_VALUES: [GameKeywords; 18] = [
        GameKeywords::All,
        GameKeywords::Other,
        GameKeywords::SpanishLA,
        GameKeywords::Korean,
        GameKeywords::Russian,
        GameKeywords::Portuguese,
        GameKeywords::Arabic,
        GameKeywords::Filipino,
        GameKeywords::Polish,
        GameKeywords::English,
        GameKeywords::Japanese,
        GameKeywords::SpanishEU,
        GameKeywords::Brazilian,
        GameKeywords::Dutch,
        GameKeywords::French,
        GameKeywords::German,
        GameKeywords::Italian,
        GameKeywords::Chinese,
    ];

    /// Wire value of this keyword
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Look up a keyword by its wire value
    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL_VALUES.iter().copied().find(|k| k.bits() == bits)
    }
}

// =============================================================================
// Map
// =============================================================================

/// Map a session is played on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum MapId {
    #[default]
    Skeld = 0,
    MiraHq = 1,
    Polus = 2,
}

impl std::fmt::Display for MapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapId::Skeld => write!(f, "skeld"),
            MapId::MiraHq => write!(f, "mira_hq"),
            MapId::Polus => write!(f, "polus"),
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// Default player limit of a session
pub const DEFAULT_MAX_PLAYERS: u8 = 10;

/// Matchmaking options a session is created with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Map being played
    pub map_id: MapId,
    /// Number of impostors
    pub num_impostors: u8,
    /// Language tag
    pub keywords: GameKeywords,
    /// Player limit requested by the host
    pub max_players: u8,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            map_id: MapId::Skeld,
            num_impostors: 1,
            keywords: GameKeywords::Other,
            max_players: DEFAULT_MAX_PLAYERS,
        }
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    NotStarted,
    Active,
    Ended,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::NotStarted => write!(f, "not_started"),
            SessionState::Active => write!(f, "active"),
            SessionState::Ended => write!(f, "ended"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_bits() {
        assert_eq!(GameKeywords::English.bits(), 256);
        assert_eq!(GameKeywords::from_bits(256), Some(GameKeywords::English));
        assert_eq!(GameKeywords::from_bits(3), None);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: GameOptions =
            serde_json::from_str(r#"{"keywords":"English","num_impostors":2}"#).unwrap();
        assert_eq!(options.keywords, GameKeywords::English);
        assert_eq!(options.num_impostors, 2);
        assert_eq!(options.max_players, DEFAULT_MAX_PLAYERS);
        assert_eq!(options.map_id, MapId::Skeld);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(format!("{}", SessionState::NotStarted), "not_started");
        assert_eq!(format!("{}", SessionState::Ended), "ended");
    }
}
