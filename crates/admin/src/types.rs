//! Request and reply shapes for every admin method.

use corelib::{ChainId, NetworkId, NodeId, PeerRecord};
use serde::{Deserialize, Serialize};

/// Arguments for `getBlockchainID`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetBlockchainIdArgs {
    pub alias: String,
}

/// Arguments for the profile methods that write to a file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileArgs {
    pub filename: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AliasArgs {
    pub endpoint: String,
    pub alias: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AliasChainArgs {
    pub chain: String,
    pub alias: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetNodeVersionReply {
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetNodeIdReply {
    #[serde(rename = "nodeID")]
    pub node_id: NodeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetNetworkIdReply {
    #[serde(rename = "networkID", with = "u32_string")]
    pub network_id: NetworkId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetNetworkNameReply {
    #[serde(rename = "networkName")]
    pub network_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlockchainIdReply {
    #[serde(rename = "blockchainID")]
    pub blockchain_id: ChainId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeersReply {
    pub peers: Vec<PeerRecord>,
}

/// Reply for every method that only reports success.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessReply {
    pub success: bool,
}

impl SuccessReply {
    pub const OK: SuccessReply = SuccessReply { success: true };
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StacktraceReply {
    pub stacktrace: String,
}

/// 32-bit ids travel as decimal strings.
mod u32_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_network_id_is_a_string_on_the_wire() {
        let reply = GetNetworkIdReply { network_id: 12345 };
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({ "networkID": "12345" })
        );
        let back: GetNetworkIdReply =
            serde_json::from_value(json!({ "networkID": "3" })).unwrap();
        assert_eq!(back.network_id, 3);
    }

    #[test]
    fn test_success_reply_shape() {
        assert_eq!(
            serde_json::to_value(SuccessReply::OK).unwrap(),
            json!({ "success": true })
        );
    }
}
