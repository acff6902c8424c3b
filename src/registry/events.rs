//! Registry Events
//!
//! Events emitted by the session registry for external consumers to react to
//! session lifecycle changes.

use serde::{Deserialize, Serialize};

/// Events emitted by the session registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A session was created and its code claimed cluster-wide
    SessionCreated {
        code: i32,
        display_code: String,
        attempts: u32,
    },

    /// A session was removed from this node
    SessionRemoved { code: i32, display_code: String },

    /// A candidate code was already taken locally or by another node
    CodeCollision { display_code: String },

    /// A create call gave up
    CreationFailed { attempts: u32, reason: String },

    /// A cluster claim could not be released
    ClaimReleaseFailed { display_code: String, reason: String },
}

impl SessionEvent {
    /// Get the display code associated with this event
    pub fn display_code(&self) -> Option<&str> {
        match self {
            SessionEvent::SessionCreated { display_code, .. } => Some(display_code),
            SessionEvent::SessionRemoved { display_code, .. } => Some(display_code),
            SessionEvent::CodeCollision { display_code } => Some(display_code),
            SessionEvent::ClaimReleaseFailed { display_code, .. } => Some(display_code),
            SessionEvent::CreationFailed { .. } => None,
        }
    }

    /// Check if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SessionEvent::CreationFailed { .. } | SessionEvent::ClaimReleaseFailed { .. }
        )
    }
}
