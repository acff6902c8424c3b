//! Node Directory Adapters
//!
//! Implementations of the [`NodeDirectory`](crate::domain::ports::NodeDirectory)
//! port:
//! - Memory: process-local map for single-node deployments and tests

pub mod memory;

pub use memory::*;
