//! Reference collaborators for the admin API.
//!
//! In-process implementations of the `corelib` contracts:
//! - `RouteTable`: path → endpoint table with read-intent alias registration
//! - `ChainRegistry`: chain ids and their aliases
//! - `PeerTable`: connected peers, snapshotted by copy
//! - `ProcessProfiler`: sampling CPU profile, heap and lock snapshots
//! - `BacktraceDumper`: stack dumps

pub mod chain_registry;
pub mod peer_table;
pub mod profiler;
pub mod route_table;
pub mod stack;

pub use chain_registry::ChainRegistry;
pub use peer_table::PeerTable;
pub use profiler::{ProcessProfiler, DEFAULT_SAMPLE_INTERVAL};
pub use route_table::RouteTable;
pub use stack::BacktraceDumper;
