//! # Flowtrace Graph
//!
//! Directed account-graph representation and graph analytics for the
//! Flowtrace engine.
//!
//! ## Contents
//!
//! - `AccountGraph` - deduplicated directed graph over account ids
//! - Weakly connected components (ring clustering support)
//! - Ego-network extraction (undirected radius, directed structure)
//! - `StructuralCloneSearch` - query kernel finding all neighborhoods
//!   isomorphic to a target's ego network, via a pluggable backtracking
//!   matcher

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
pub mod ego;
pub mod isomorphism;
pub mod messages;
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::components::weakly_connected_components;
    pub use crate::ego::ego_network;
    pub use crate::isomorphism::{BacktrackingMatcher, IsomorphismTester, StructuralCloneSearch};
    pub use crate::messages::{CloneSearchInput, CloneSearchOutput};
    pub use crate::types::{AccountGraph, CloneSearchResult};
}

/// Register all graph kernels with a registry.
pub fn register_all(
    registry: &flowtrace_core::registry::KernelRegistry,
) -> flowtrace_core::error::Result<()> {
    use flowtrace_core::traits::AnalyticKernel;

    tracing::info!("Registering graph analytics kernels");

    registry.register_metadata(isomorphism::StructuralCloneSearch::new().metadata().clone())?;

    tracing::info!("Registered 1 graph analytics kernel");
    Ok(())
}
