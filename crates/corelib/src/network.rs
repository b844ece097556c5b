//! Network identity and the peer directory contract.

use crate::node::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric id of the network this node participates in.
pub type NetworkId = u32;

pub const MAINNET_ID: NetworkId = 1;
pub const CASCADE_ID: NetworkId = 2;
pub const DENALI_ID: NetworkId = 3;
pub const EVEREST_ID: NetworkId = 4;
pub const LOCAL_ID: NetworkId = 12345;

/// Human-readable name for a network id.
///
/// Unknown ids render as `network-<id>`.
pub fn network_name(id: NetworkId) -> String {
    match id {
        MAINNET_ID => "mainnet".to_string(),
        CASCADE_ID => "cascade".to_string(),
        DENALI_ID => "denali".to_string(),
        EVEREST_ID => "everest".to_string(),
        LOCAL_ID => "local".to_string(),
        other => format!("network-{other}"),
    }
}

/// Point-in-time copy of one connected peer.
///
/// Records are values: once handed out they are never updated, whatever the
/// network layer does with the live connection afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerRecord {
    pub ip: String,
    #[serde(rename = "publicIP")]
    pub public_ip: String,
    pub id: NodeId,
    pub version: String,
    pub last_sent: DateTime<Utc>,
    pub last_received: DateTime<Utc>,
}

/// Source of connected-peer snapshots.
///
/// Implementations must return copies; no caching is expected on the admin
/// side, each call is accurate as of call time only.
pub trait NetworkDirectory: Send + Sync + 'static {
    /// Copy out the currently connected peers.
    fn snapshot_peers(&self) -> Vec<PeerRecord>;
}
