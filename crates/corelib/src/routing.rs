//! Routing contracts: mounted endpoints and alias registration.
//!
//! The admin core only needs to add names to the routing table. How the table
//! stays readable while names are added (reader-writer lock with read intent,
//! snapshot swap, ...) is the table's decision, not the caller's.

use crate::error::Result;

/// Anything mounted on a route path.
pub trait Endpoint: Send + Sync + 'static {
    /// Handle one request body and produce the response body.
    fn handle(&self, body: &str) -> String;
}

/// Capability to give an existing route path additional names.
pub trait AliasRegistrar: Send + Sync + 'static {
    /// Register `alias` as another name for the endpoint mounted at `path`.
    ///
    /// Must be safe to call while other threads are resolving routes.
    fn register_alias(&self, path: &str, alias: &str) -> Result<()>;

    /// Remove a name previously added with [`AliasRegistrar::register_alias`].
    fn remove_alias(&self, alias: &str) -> Result<()>;
}
