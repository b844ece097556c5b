//! CLI tool for administering a node.
//!
//! Provides commands for:
//! - Serving admin requests from stdin
//! - One-shot admin calls
//! - Inspecting the route table

pub mod commands;
pub mod config;
pub mod node;

pub use commands::{Command, CommandResult};
pub use config::{CliConfig, NodeConfig};
pub use node::Node;
