//! Chain identifiers and the chain-resolution contract.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical chain identifier assigned by the chain manager.
///
/// Independent of any alias. Rendered as 64 lowercase hex digits.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ChainId(pub [u8; 32]);

impl ChainId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for ChainId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| Error::InvalidArgument(format!("chain id {s:?}: {e}")))?;
        Ok(ChainId(bytes))
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Resolves chain aliases to canonical ids and records new aliases.
///
/// # Thread Safety
///
/// Shared across request threads; implementations synchronize internally.
pub trait ChainResolver: Send + Sync + 'static {
    /// Resolve an alias (or a canonical id's text form) to a chain id.
    ///
    /// Returns [`Error::NotFound`] for an unknown alias.
    fn lookup(&self, alias: &str) -> Result<ChainId>;

    /// Make `alias` resolve to `chain` from now on.
    fn register_alias(&self, chain: ChainId, alias: &str) -> Result<()>;

    /// Forget an alias registered through [`ChainResolver::register_alias`].
    ///
    /// Used to compensate a chain alias whose route registration failed.
    fn remove_alias(&self, alias: &str) -> Result<()>;
}
