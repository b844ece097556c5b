//! In-memory routing table.
//!
//! Maps route paths to mounted endpoints. Aliases are extra paths sharing the
//! endpoint of an existing path.
//!
//! # Concurrency
//!
//! Request routing takes plain read locks. Alias registration takes the
//! `parking_lot` upgradable read lock (read intent): it coexists with readers
//! while it validates the request and only upgrades to exclusive access for
//! the insert itself. Two registrations still serialize against each other,
//! since only one upgradable guard exists at a time.

use corelib::{AliasRegistrar, Endpoint, Error, Result};
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
struct Route {
    endpoint: Arc<dyn Endpoint>,
    /// Path the endpoint was originally mounted at.
    target: String,
}

impl Route {
    fn is_alias(&self, path: &str) -> bool {
        self.target != path
    }
}

fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

/// Path → endpoint table shared by request routing and the admin API.
#[derive(Default)]
pub struct RouteTable {
    routes: RwLock<HashMap<String, Route>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount an endpoint at a new path.
    pub fn register(&self, path: &str, endpoint: Arc<dyn Endpoint>) -> Result<()> {
        let path = normalize(path);
        if path.is_empty() {
            return Err(Error::InvalidArgument("empty route path".to_string()));
        }

        let mut routes = self.routes.write();
        if routes.contains_key(path) {
            return Err(Error::AliasInUse(path.to_string()));
        }
        routes.insert(
            path.to_string(),
            Route {
                endpoint,
                target: path.to_string(),
            },
        );
        debug!(path, "route registered");
        Ok(())
    }

    /// Endpoint serving `path`, whether it is a primary path or an alias.
    pub fn resolve(&self, path: &str) -> Option<Arc<dyn Endpoint>> {
        self.routes
            .read()
            .get(normalize(path))
            .map(|route| Arc::clone(&route.endpoint))
    }

    /// All paths, sorted, with the primary path each alias points at.
    pub fn paths(&self) -> Vec<(String, Option<String>)> {
        let routes = self.routes.read();
        let mut paths: Vec<_> = routes
            .iter()
            .map(|(path, route)| {
                let target = route.is_alias(path).then(|| route.target.clone());
                (path.clone(), target)
            })
            .collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }
}

impl AliasRegistrar for RouteTable {
    fn register_alias(&self, path: &str, alias: &str) -> Result<()> {
        let (path, alias) = (normalize(path), normalize(alias));
        if alias.is_empty() {
            return Err(Error::InvalidArgument("empty alias".to_string()));
        }

        let routes = self.routes.upgradable_read();
        let route = routes
            .get(path)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no route at {path}")))?;
        if routes.contains_key(alias) {
            return Err(Error::AliasInUse(alias.to_string()));
        }

        let mut routes = RwLockUpgradableReadGuard::upgrade(routes);
        routes.insert(alias.to_string(), route);
        debug!(path, alias, "route alias registered");
        Ok(())
    }

    fn remove_alias(&self, alias: &str) -> Result<()> {
        let alias = normalize(alias);
        let mut routes = self.routes.write();
        match routes.get(alias) {
            None => Err(Error::NotFound(format!("no route at {alias}"))),
            Some(route) if !route.is_alias(alias) => Err(Error::InvalidArgument(format!(
                "{alias} is a primary route, not an alias"
            ))),
            Some(_) => {
                routes.remove(alias);
                Ok(())
            }
        }
    }
}
