//! Core library for the node admin API.
//!
//! This crate provides the shared vocabulary of the admin surface:
//! - Node identity (version, node id, network id)
//! - Peer snapshots and the network directory contract
//! - Chain ids and the chain resolver contract
//! - Routing endpoints and alias registration
//! - Profiling and stack-dump contracts
//! - The error taxonomy every collaborator reports with

pub mod chain;
pub mod diagnostics;
pub mod error;
pub mod network;
pub mod node;
pub mod routing;

pub use chain::{ChainId, ChainResolver};
pub use diagnostics::{ProfilingBackend, StackDumper};
pub use error::{Error, Result};
pub use network::{network_name, NetworkDirectory, NetworkId, PeerRecord};
pub use node::{NodeId, NodeIdentity, Version};
pub use routing::{AliasRegistrar, Endpoint};
