//! Server Configuration
//!
//! Settings for the session directory of one server node. Values come from
//! an optional YAML file; the binary layers CLI/env overrides on top.

use crate::code::CodeLength;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

/// Default public port advertised to clients
pub const DEFAULT_PUBLIC_PORT: u16 = 22023;

/// Default number of candidate codes tried by one create call
pub const DEFAULT_MAX_CREATE_ATTEMPTS: u32 = 5;

/// Default bound on a single Node Directory call
pub const DEFAULT_DIRECTORY_TIMEOUT_MS: u64 = 2_000;

/// Default player ceiling applied by discovery
pub const DEFAULT_ROOM_CAPACITY: u8 = 10;

/// Configuration of the session directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address advertised to clients and recorded in the Node Directory
    pub public_ip: IpAddr,
    /// Port advertised alongside `public_ip`
    pub public_port: u16,
    /// Display length of generated codes (4 or 6)
    pub code_length: CodeLength,
    /// Candidate codes tried before create gives up
    pub max_create_attempts: u32,
    /// Upper bound on each Node Directory call, in milliseconds
    pub directory_timeout_ms: u64,
    /// Sessions at or above this many players are not listed
    pub room_capacity: u8,
    /// Event channel capacity
    pub event_channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            public_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            public_port: DEFAULT_PUBLIC_PORT,
            code_length: CodeLength::Six,
            max_create_attempts: DEFAULT_MAX_CREATE_ATTEMPTS,
            directory_timeout_ms: DEFAULT_DIRECTORY_TIMEOUT_MS,
            room_capacity: DEFAULT_ROOM_CAPACITY,
            event_channel_capacity: 1024,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: ServerConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the registry cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_create_attempts == 0 {
            return Err(Error::Configuration(
                "max_create_attempts must be at least 1".into(),
            ));
        }
        if self.directory_timeout_ms == 0 {
            return Err(Error::Configuration(
                "directory_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.room_capacity == 0 {
            return Err(Error::Configuration(
                "room_capacity must be greater than 0".into(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::Configuration(
                "event_channel_capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Endpoint this node advertises
    pub fn public_endpoint(&self) -> SocketAddr {
        SocketAddr::new(self.public_ip, self.public_port)
    }

    /// Bound on a single Node Directory call
    pub fn directory_timeout(&self) -> Duration {
        Duration::from_millis(self.directory_timeout_ms)
    }
}
