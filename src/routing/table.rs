//! Atomically published route tree.
//!
//! # Responsibilities
//! - Hand every request a complete, consistent tree snapshot
//! - Replace the whole tree on reconfiguration, never edit it in place
//! - Keep the previous tree serving when a rebuild fails
//!
//! # Design Decisions
//! - `ArcSwap` gives lock-free reads; in-flight matches keep their own `Arc`
//!   to the snapshot they started with

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::routing::{RouteError, RouteRegistry, RouteTree, RouterOptions};

/// Shared handle to the currently published tree.
#[derive(Debug)]
pub struct RouteTable<H> {
    current: ArcSwap<RouteTree<H>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new(RouteTree::default())
    }
}

impl<H> RouteTable<H> {
    pub fn new(tree: RouteTree<H>) -> Self {
        Self {
            current: ArcSwap::from_pointee(tree),
        }
    }

    /// Snapshot of the tree currently being served.
    pub fn load(&self) -> Arc<RouteTree<H>> {
        self.current.load_full()
    }

    /// Replace the served tree.
    pub fn publish(&self, tree: RouteTree<H>) {
        let routes = tree.len();
        self.current.store(Arc::new(tree));
        tracing::info!(routes, "Route tree published");
    }

    /// Build a fresh tree with `configure` and publish it.
    ///
    /// On error nothing is published. Returns the new route count.
    pub fn rebuild<F>(&self, options: RouterOptions, configure: F) -> Result<usize, RouteError>
    where
        F: FnOnce(&mut RouteRegistry<H>) -> Result<(), RouteError>,
    {
        let mut registry = RouteRegistry::with_options(options);
        if let Err(e) = configure(&mut registry) {
            tracing::error!(error = %e, "Route rebuild failed. Keeping current routes.");
            return Err(e);
        }
        let tree = registry.build();
        let routes = tree.len();
        self.publish(tree);
        Ok(routes)
    }
}
