//! Admin API for a running node.
//!
//! This crate lets an operator introspect and steer a node without a restart:
//! - Identity, version and network metadata
//! - Connected peer snapshots
//! - CPU profiling (start/stop) and heap/lock snapshots
//! - Endpoint and chain aliases
//! - Stack dumps
//!
//! All domain work is delegated to the collaborators defined in `corelib`.

pub mod alias;
pub mod error;
pub mod profiler;
pub mod router;
pub mod service;
pub mod types;

pub use alias::{chain_route, AliasCoordinator, CHAIN_ROUTE_PREFIX};
pub use error::{RpcError, RpcFailure};
pub use profiler::{ProfilerController, ProfilerState};
pub use router::{AdminMethod, AdminRouter, RpcRequest, RpcResponse};
pub use service::{AdminService, Collaborators};
