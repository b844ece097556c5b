//! Node identity.
//!
//! A node is described by an immutable [`NodeIdentity`] captured once at
//! startup. Nodes are identified by a compact `NodeId` that is cheap to compare
//! and hash.

use crate::error::Error;
use crate::network::NetworkId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Compact identifier for a node in the cluster.
///
/// Newtype over `u128` so comparisons and hashing are very fast while giving
/// plenty of space for uniqueness. Rendered as 32 lowercase hex digits.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub u128);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u128::from_str_radix(s, 16)
            .map(NodeId)
            .map_err(|e| Error::InvalidArgument(format!("node id {s:?}: {e}")))
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Application version, rendered as `app/major.minor.patch`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Version {
    pub app: String,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(app: impl Into<String>, major: u32, minor: u32, patch: u32) -> Self {
        Self {
            app: app.into(),
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}.{}", self.app, self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidArgument(format!("version {s:?}: expected app/x.y.z"));

        let (app, numbers) = s.split_once('/').ok_or_else(invalid)?;
        if app.is_empty() {
            return Err(invalid());
        }
        let mut parts = numbers.split('.').map(|p| p.parse::<u32>().map_err(|_| invalid()));
        let major = parts.next().ok_or_else(invalid)??;
        let minor = parts.next().ok_or_else(invalid)??;
        let patch = parts.next().ok_or_else(invalid)??;
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Version::new(app, major, minor, patch))
    }
}

/// Immutable snapshot of who this node is.
///
/// Built once at startup and shared by `Arc`; it is never mutated, so readers
/// need no synchronization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeIdentity {
    version: Version,
    node_id: NodeId,
    network_id: NetworkId,
}

impl NodeIdentity {
    pub fn new(version: Version, node_id: NodeId, network_id: NetworkId) -> Self {
        Self {
            version,
            node_id,
            network_id,
        }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }
}
