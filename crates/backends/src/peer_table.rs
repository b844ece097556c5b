//! Live peer table.
//!
//! The network layer updates entries in place as messages flow; the admin API
//! only ever sees copies taken by [`NetworkDirectory::snapshot_peers`].

use chrono::{DateTime, Utc};
use corelib::{NetworkDirectory, NodeId, PeerRecord};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct PeerTable {
    peers: RwLock<HashMap<NodeId, PeerRecord>>,
}

impl PeerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a connected peer.
    pub fn connect(&self, peer: PeerRecord) {
        self.peers.write().insert(peer.id, peer);
    }

    pub fn disconnect(&self, id: &NodeId) -> bool {
        self.peers.write().remove(id).is_some()
    }

    /// Returns false for an unknown peer.
    pub fn record_sent(&self, id: &NodeId, at: DateTime<Utc>) -> bool {
        self.peers
            .write()
            .get_mut(id)
            .map(|peer| peer.last_sent = at)
            .is_some()
    }

    /// Returns false for an unknown peer.
    pub fn record_received(&self, id: &NodeId, at: DateTime<Utc>) -> bool {
        self.peers
            .write()
            .get_mut(id)
            .map(|peer| peer.last_received = at)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }
}

impl NetworkDirectory for PeerTable {
    fn snapshot_peers(&self) -> Vec<PeerRecord> {
        let mut peers: Vec<PeerRecord> = self.peers.read().values().cloned().collect();
        peers.sort_by_key(|peer| peer.id);
        peers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn peer(id: u128) -> PeerRecord {
        let now = Utc::now();
        PeerRecord {
            ip: format!("10.0.0.{id}:9651"),
            public_ip: format!("1.2.3.{id}:9651"),
            id: NodeId(id),
            version: "gecko/0.5.7".to_string(),
            last_sent: now,
            last_received: now,
        }
    }

    #[test]
    fn test_snapshot_sorted_by_id() {
        let table = PeerTable::new();
        table.connect(peer(3));
        table.connect(peer(1));
        table.connect(peer(2));
        let ids: Vec<_> = table.snapshot_peers().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let table = PeerTable::new();
        table.connect(peer(1));
        let before = table.snapshot_peers();

        let later = before[0].last_sent + Duration::seconds(30);
        assert!(table.record_sent(&NodeId(1), later));
        table.disconnect(&NodeId(1));

        assert_eq!(before.len(), 1);
        assert_ne!(before[0].last_sent, later);
        assert!(table.snapshot_peers().is_empty());
    }

    #[test]
    fn test_updates_for_unknown_peer() {
        let table = PeerTable::new();
        assert!(!table.record_received(&NodeId(5), Utc::now()));
        assert!(!table.disconnect(&NodeId(5)));
    }
}
