//! In-memory chain registry: alias → canonical chain id.

use corelib::{ChainId, ChainResolver, Error, Result};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use tracing::debug;

/// Known chains and their aliases.
///
/// An alias maps to exactly one chain and is never silently rebound. The
/// canonical id's hex form always resolves, alias or not.
#[derive(Default)]
pub struct ChainRegistry {
    chains: DashSet<ChainId>,
    aliases: DashMap<String, ChainId>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chain, optionally with a first alias.
    pub fn create_chain(&self, chain: ChainId, primary_alias: Option<&str>) -> Result<()> {
        self.chains.insert(chain);
        if let Some(alias) = primary_alias {
            self.register_alias(chain, alias)?;
        }
        Ok(())
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Aliases currently bound to `chain`, sorted.
    pub fn aliases_of(&self, chain: ChainId) -> Vec<String> {
        let mut aliases: Vec<String> = self
            .aliases
            .iter()
            .filter(|entry| *entry.value() == chain)
            .map(|entry| entry.key().clone())
            .collect();
        aliases.sort();
        aliases
    }
}

impl ChainResolver for ChainRegistry {
    fn lookup(&self, alias: &str) -> Result<ChainId> {
        if let Some(chain) = self.aliases.get(alias) {
            return Ok(*chain);
        }
        match alias.parse::<ChainId>() {
            Ok(chain) if self.chains.contains(&chain) => Ok(chain),
            _ => Err(Error::NotFound(format!(
                "there is no chain with alias/ID '{alias}'"
            ))),
        }
    }

    fn register_alias(&self, chain: ChainId, alias: &str) -> Result<()> {
        if alias.is_empty() {
            return Err(Error::InvalidArgument("empty chain alias".to_string()));
        }
        if !self.chains.contains(&chain) {
            return Err(Error::NotFound(format!("no chain {chain}")));
        }

        match self.aliases.entry(alias.to_string()) {
            Entry::Occupied(_) => Err(Error::AliasInUse(alias.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(chain);
                debug!(%chain, alias, "chain alias registered");
                Ok(())
            }
        }
    }

    fn remove_alias(&self, alias: &str) -> Result<()> {
        self.aliases
            .remove(alias)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("no chain alias '{alias}'")))
    }
}
