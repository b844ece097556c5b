//! Command-line flags and the node config file.

use crate::commands::{Command, CommandResult};
use crate::node::Node;
use anyhow::{anyhow, Context};
use clap::Parser;
use corelib::network::LOCAL_ID;
use corelib::{ChainId, NetworkId, NodeId, NodeIdentity, Version};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Administer a node through its admin API.
#[derive(Debug, Parser)]
#[command(name = "node-admin", version, about)]
pub struct CliConfig {
    /// TOML node config; built-in defaults when absent
    #[arg(long, env = "NODE_ADMIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the node id (32 hex digits)
    #[arg(long, env = "NODE_ADMIN_NODE_ID")]
    pub node_id: Option<NodeId>,

    /// Override the network id
    #[arg(long, env = "NODE_ADMIN_NETWORK_ID")]
    pub network_id: Option<NetworkId>,

    /// Log filter, e.g. `info` or `admin=debug`
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(self) -> anyhow::Result<()> {
        init_tracing(&self.log_level)?;

        let mut node_config = NodeConfig::load(self.config.as_deref())?;
        if let Some(node_id) = self.node_id {
            node_config.node_id = node_id;
        }
        if let Some(network_id) = self.network_id {
            node_config.network_id = network_id;
        }

        let node = Node::build(&node_config)?;
        let result: CommandResult = self.command.execute(node)?;
        println!("{result}");
        Ok(())
    }
}

fn init_tracing(filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter).with_context(|| format!("invalid log filter {filter:?}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

/// A chain known at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub id: ChainId,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// A peer connected at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConfig {
    pub id: NodeId,
    pub ip: String,
    pub public_ip: String,
    pub version: String,
}

/// Node description loaded from TOML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// `app/major.minor.patch`
    pub version: String,
    pub node_id: NodeId,
    pub network_id: NetworkId,
    pub cpu_sample_interval_ms: u64,
    pub chains: Vec<ChainConfig>,
    pub peers: Vec<PeerConfig>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            version: format!("node-admin/{}", env!("CARGO_PKG_VERSION")),
            node_id: NodeId(1),
            network_id: LOCAL_ID,
            cpu_sample_interval_ms: 100,
            chains: Vec::new(),
            peers: Vec::new(),
        }
    }
}

impl NodeConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading node config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing node config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn identity(&self) -> anyhow::Result<NodeIdentity> {
        let version: Version = self.version.parse()?;
        Ok(NodeIdentity::new(version, self.node_id, self.network_id))
    }

    pub fn cpu_sample_interval(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_interval_ms.max(1))
    }
}
