//! Domain Ports - Core trait definitions for the session directory
//!
//! These traits define the boundary between the session registry and the
//! cluster-wide storage that tracks which node owns which code. Adapters
//! implement these traits to provide concrete functionality.

use crate::error::Result;
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;

// =============================================================================
// Node Directory Port
// =============================================================================

/// Cluster-wide mapping from display code to the address of the owning node
///
/// Every call may be a slow or failing network round trip; callers bound
/// them with a timeout.
#[async_trait]
pub trait NodeDirectory: Send + Sync {
    /// Look up the node owning `code`
    async fn find(&self, code: &str) -> Result<Option<SocketAddr>>;

    /// Record `node` as the owner of `code`, replacing any previous owner
    async fn save(&self, code: &str, node: SocketAddr) -> Result<()>;

    /// Forget the owner of `code`
    async fn remove(&self, code: &str) -> Result<()>;

    /// Claim `code` for `node` if nobody owns it yet
    ///
    /// Returns `false` when another owner is already recorded. The default
    /// is a find followed by a save and is not atomic; backends with a
    /// conditional write should override it.
    async fn try_claim(&self, code: &str, node: SocketAddr) -> Result<bool> {
        if self.find(code).await?.is_some() {
            return Ok(false);
        }
        self.save(code, node).await?;
        Ok(true)
    }

    /// Release `code` only if it is still owned by `node`
    ///
    /// Returns `true` if an entry was removed.
    async fn release(&self, code: &str, node: SocketAddr) -> Result<bool> {
        match self.find(code).await? {
            Some(owner) if owner == node => {
                self.remove(code).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Get backend name
    fn backend_name(&self) -> &str;
}

// =============================================================================
// Type Aliases for Arc'd Traits
// =============================================================================

pub type NodeDirectoryRef = Arc<dyn NodeDirectory>;

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// Directory exposing only the three primitives
    #[derive(Default)]
    struct PrimitiveDirectory {
        entries: Mutex<HashMap<String, SocketAddr>>,
    }

    #[async_trait]
    impl NodeDirectory for PrimitiveDirectory {
        async fn find(&self, code: &str) -> Result<Option<SocketAddr>> {
            Ok(self.entries.lock().get(code).copied())
        }

        async fn save(&self, code: &str, node: SocketAddr) -> Result<()> {
            self.entries.lock().insert(code.to_string(), node);
            Ok(())
        }

        async fn remove(&self, code: &str) -> Result<()> {
            self.entries.lock().remove(code);
            Ok(())
        }

        fn backend_name(&self) -> &str {
            "primitive"
        }
    }

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([10, 0, 0, 1], port))
    }

    #[tokio::test]
    async fn test_default_claim_is_insert_if_absent() {
        let directory = PrimitiveDirectory::default();

        assert!(directory.try_claim("REDSUS", addr(22023)).await.unwrap());
        assert!(!directory.try_claim("REDSUS", addr(22024)).await.unwrap());
        assert_eq!(directory.find("REDSUS").await.unwrap(), Some(addr(22023)));
    }

    #[tokio::test]
    async fn test_default_release_checks_owner() {
        let directory = PrimitiveDirectory::default();
        directory.save("REDSUS", addr(22023)).await.unwrap();

        assert!(!directory.release("REDSUS", addr(22024)).await.unwrap());
        assert_eq!(directory.find("REDSUS").await.unwrap(), Some(addr(22023)));

        assert!(directory.release("REDSUS", addr(22023)).await.unwrap());
        assert_eq!(directory.find("REDSUS").await.unwrap(), None);

        assert!(!directory.release("REDSUS", addr(22023)).await.unwrap());
    }
}
