//! Wires the admin service to the in-memory collaborators.

use crate::config::NodeConfig;
use admin::{chain_route, AdminRouter, AdminService, Collaborators};
use anyhow::Context;
use backends::{BacktraceDumper, ChainRegistry, PeerTable, ProcessProfiler, RouteTable};
use chrono::Utc;
use corelib::{ChainId, ChainResolver, Endpoint, PeerRecord};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Path the admin router is mounted at.
pub const ADMIN_PATH: &str = "admin";

/// Stand-in for a chain's API: reports which chain served the request.
pub struct ChainEndpoint {
    chain: ChainId,
}

impl Endpoint for ChainEndpoint {
    fn handle(&self, body: &str) -> String {
        json!({ "chain": self.chain, "request": body }).to_string()
    }
}

/// A running node as far as the admin API is concerned.
pub struct Node {
    pub routes: Arc<RouteTable>,
    pub chains: Arc<ChainRegistry>,
    pub peers: Arc<PeerTable>,
    pub admin: AdminRouter,
}

impl Node {
    pub fn build(config: &NodeConfig) -> anyhow::Result<Self> {
        let identity = Arc::new(config.identity()?);
        let routes = Arc::new(RouteTable::new());
        let chains = Arc::new(ChainRegistry::new());
        let peers = Arc::new(PeerTable::new());

        for chain in &config.chains {
            chains.create_chain(chain.id, None)?;
            for alias in &chain.aliases {
                chains
                    .register_alias(chain.id, alias)
                    .with_context(|| format!("aliasing chain {} as {alias}", chain.id))?;
            }
            routes.register(&chain_route(chain.id), Arc::new(ChainEndpoint { chain: chain.id }))?;
        }

        let now = Utc::now();
        for peer in &config.peers {
            peers.connect(PeerRecord {
                ip: peer.ip.clone(),
                public_ip: peer.public_ip.clone(),
                id: peer.id,
                version: peer.version.clone(),
                last_sent: now,
                last_received: now,
            });
        }

        let service = AdminService::new(
            identity,
            Collaborators {
                network: peers.clone(),
                chains: chains.clone(),
                routes: routes.clone(),
                profiling: Arc::new(ProcessProfiler::new(config.cpu_sample_interval())),
                stacks: Arc::new(BacktraceDumper),
            },
        );
        let admin = AdminRouter::new(Arc::new(service));
        routes.register(ADMIN_PATH, Arc::new(admin.clone()))?;

        info!(
            node_id = %config.node_id,
            network_id = config.network_id,
            chains = config.chains.len(),
            peers = config.peers.len(),
            "node assembled"
        );

        Ok(Self {
            routes,
            chains,
            peers,
            admin,
        })
    }

    /// Route one `<path> <body>` line to its endpoint.
    pub fn route_line(&self, line: &str) -> String {
        let line = line.trim();
        let (path, body) = line
            .split_once(char::is_whitespace)
            .map(|(path, body)| (path, body.trim()))
            .unwrap_or((line, ""));
        self.route(path, body)
    }

    pub fn route(&self, path: &str, body: &str) -> String {
        match self.routes.resolve(path) {
            Some(endpoint) => endpoint.handle(body),
            None => json!({ "path": path, "error": "no route" }).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ChainConfig, PeerConfig};
    use corelib::NodeId;
    use serde_json::Value;

    fn config() -> NodeConfig {
        NodeConfig {
            chains: vec![ChainConfig {
                id: ChainId([0xab; 32]),
                aliases: vec!["X".to_string()],
            }],
            peers: vec![PeerConfig {
                id: NodeId(7),
                ip: "10.0.0.7:9651".to_string(),
                public_ip: "1.2.3.7:9651".to_string(),
                version: "gecko/0.5.6".to_string(),
            }],
            ..NodeConfig::default()
        }
    }

    #[test]
    fn test_build_seeds_collaborators() {
        let node = Node::build(&config()).unwrap();
        assert_eq!(node.chains.lookup("X").unwrap(), ChainId([0xab; 32]));
        assert_eq!(node.peers.len(), 1);
        assert!(node.routes.resolve(ADMIN_PATH).is_some());
        assert!(node.routes.resolve(&chain_route(ChainId([0xab; 32]))).is_some());
    }

    #[test]
    fn test_alias_chain_over_the_wire() {
        let node = Node::build(&config()).unwrap();
        let reply: Value = serde_json::from_str(&node.route_line(
            r#"admin {"jsonrpc":"2.0","id":1,"method":"admin.aliasChain","params":{"chain":"X","alias":"x-chain"}}"#,
        ))
        .unwrap();
        assert_eq!(reply["result"]["success"], true);

        let via_alias: Value = serde_json::from_str(&node.route_line("bc/x-chain ping")).unwrap();
        assert_eq!(via_alias["chain"], ChainId([0xab; 32]).to_string());
        assert_eq!(via_alias["request"], "ping");
    }

    #[test]
    fn test_unknown_route() {
        let node = Node::build(&config()).unwrap();
        let reply: Value = serde_json::from_str(&node.route_line("nowhere {}")).unwrap();
        assert_eq!(reply["error"], "no route");
    }
}
