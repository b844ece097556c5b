//! Endpoint and chain alias registration.
//!
//! A chain alias touches two collaborators: the chain resolver learns the new
//! alias, and the routing table learns `bc/<alias>` as another name for
//! `bc/<chainID>`. The pair is all-or-nothing: when the route registration
//! fails the resolver alias is removed again before the error is returned.

use corelib::{AliasRegistrar, ChainId, ChainResolver, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Route prefix under which chains are mounted.
pub const CHAIN_ROUTE_PREFIX: &str = "bc/";

/// Route path of a chain (or chain alias).
pub fn chain_route(name: impl std::fmt::Display) -> String {
    format!("{CHAIN_ROUTE_PREFIX}{name}")
}

pub struct AliasCoordinator {
    routes: Arc<dyn AliasRegistrar>,
    chains: Arc<dyn ChainResolver>,
}

impl AliasCoordinator {
    pub fn new(routes: Arc<dyn AliasRegistrar>, chains: Arc<dyn ChainResolver>) -> Self {
        Self { routes, chains }
    }

    /// Give the endpoint at `endpoint` the extra name `alias`.
    pub fn alias(&self, endpoint: &str, alias: &str) -> Result<()> {
        self.routes.register_alias(endpoint, alias)?;
        info!(endpoint, alias, "endpoint alias registered");
        Ok(())
    }

    /// Alias a chain and its route. Returns the canonical chain id.
    pub fn alias_chain(&self, chain: &str, alias: &str) -> Result<ChainId> {
        let chain_id = self.chains.lookup(chain)?;
        self.chains.register_alias(chain_id, alias)?;

        let path = chain_route(chain_id);
        let route_alias = chain_route(alias);
        if let Err(err) = self.routes.register_alias(&path, &route_alias) {
            warn!(%chain_id, alias, error = %err, "chain route alias failed, rolling back");
            if let Err(rollback) = self.chains.remove_alias(alias) {
                // Resolver keeps the alias; the route does not exist.
                error!(%chain_id, alias, error = %rollback, "chain alias rollback failed");
            }
            return Err(err);
        }

        info!(%chain_id, alias, "chain alias registered");
        Ok(chain_id)
    }
}
