//! In-Memory Node Directory
//!
//! Process-local node directory using DashMap for concurrent access. Claims
//! and releases are atomic per code.

use crate::domain::ports::NodeDirectory;
use crate::error::Result;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::net::SocketAddr;

// =============================================================================
// Memory Node Directory Configuration
// =============================================================================

/// Configuration for the in-memory node directory
#[derive(Debug, Clone, Default)]
pub struct MemoryNodeDirectoryConfig {
    /// Number of shards for DashMap (0 = auto)
    pub shard_count: usize,
}

// =============================================================================
// Memory Node Directory
// =============================================================================

/// Node directory backed by a DashMap
#[derive(Debug)]
pub struct MemoryNodeDirectory {
    /// Display code -> owning node
    entries: DashMap<String, SocketAddr>,
}

impl MemoryNodeDirectory {
    /// Create an empty directory with default config
    pub fn new() -> Self {
        Self::with_config(MemoryNodeDirectoryConfig::default())
    }

    /// Create an empty directory with full config
    pub fn with_config(config: MemoryNodeDirectoryConfig) -> Self {
        let entries = if config.shard_count > 0 {
            DashMap::with_shard_amount(config.shard_count)
        } else {
            DashMap::new()
        };

        Self { entries }
    }

    /// Number of claimed codes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Codes currently claimed by `node`
    pub fn codes_owned_by(&self, node: SocketAddr) -> Vec<String> {
        self.entries
            .iter()
            .filter(|r| *r.value() == node)
            .map(|r| r.key().clone())
            .collect()
    }
}

impl Default for MemoryNodeDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeDirectory for MemoryNodeDirectory {
    async fn find(&self, code: &str) -> Result<Option<SocketAddr>> {
        Ok(self.entries.get(code).map(|r| *r.value()))
    }

    async fn save(&self, code: &str, node: SocketAddr) -> Result<()> {
        self.entries.insert(code.to_string(), node);
        Ok(())
    }

    async fn remove(&self, code: &str) -> Result<()> {
        self.entries.remove(code);
        Ok(())
    }

    async fn try_claim(&self, code: &str, node: SocketAddr) -> Result<bool> {
        match self.entries.entry(code.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(node);
                Ok(true)
            }
        }
    }

    async fn release(&self, code: &str, node: SocketAddr) -> Result<bool> {
        Ok(self.entries.remove_if(code, |_, owner| *owner == node).is_some())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[tokio::test]
    async fn test_basic_operations() {
        let directory = MemoryNodeDirectory::new();
        assert!(directory.is_empty());

        directory.save("REDSUS", addr(22023)).await.unwrap();
        assert_eq!(directory.find("REDSUS").await.unwrap(), Some(addr(22023)));
        assert_eq!(directory.len(), 1);

        directory.remove("REDSUS").await.unwrap();
        assert_eq!(directory.find("REDSUS").await.unwrap(), None);

        // Removing again is a no-op
        directory.remove("REDSUS").await.unwrap();
        assert!(directory.is_empty());
    }

    #[tokio::test]
    async fn test_claim_and_release() {
        let directory = MemoryNodeDirectory::new();

        assert!(directory.try_claim("ABCD", addr(1)).await.unwrap());
        assert!(!directory.try_claim("ABCD", addr(2)).await.unwrap());

        assert!(!directory.release("ABCD", addr(2)).await.unwrap());
        assert_eq!(directory.find("ABCD").await.unwrap(), Some(addr(1)));

        assert!(directory.release("ABCD", addr(1)).await.unwrap());
        assert!(directory.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_claims_single_winner() {
        let directory = Arc::new(MemoryNodeDirectory::with_config(MemoryNodeDirectoryConfig {
            shard_count: 4,
        }));

        let mut handles = Vec::new();
        for port in 0..32 {
            let dir = directory.clone();
            handles.push(tokio::spawn(async move {
                dir.try_claim("QWXRTY", addr(port)).await.unwrap()
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_codes_owned_by() {
        let directory = MemoryNodeDirectory::new();
        directory.save("AAAA", addr(1)).await.unwrap();
        directory.save("BBBB", addr(2)).await.unwrap();
        directory.save("CCCC", addr(1)).await.unwrap();

        let mut owned = directory.codes_owned_by(addr(1));
        owned.sort();
        assert_eq!(owned, vec!["AAAA".to_string(), "CCCC".to_string()]);
        assert_eq!(directory.backend_name(), "memory");
    }
}
