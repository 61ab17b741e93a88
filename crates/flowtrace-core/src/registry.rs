//! Kernel registry.
//!
//! The registry tracks metadata for every kernel the engine exposes and
//! provides lookup by id, domain, and mode.

use crate::domain::Domain;
use crate::error::{EngineError, Result};
use crate::kernel::{KernelMetadata, KernelMode};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// Registry statistics.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    /// Total number of registered kernels.
    pub total: usize,
    /// Number of batch kernels.
    pub batch_kernels: usize,
    /// Number of query kernels.
    pub query_kernels: usize,
    /// Kernels by domain.
    pub by_domain: HashMap<Domain, usize>,
}

/// Central registry for all kernels.
#[derive(Debug)]
pub struct KernelRegistry {
    /// Kernel metadata by ID.
    kernels: RwLock<HashMap<String, KernelMetadata>>,
}

impl KernelRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kernels: RwLock::new(HashMap::new()),
        }
    }

    /// Register a kernel's metadata.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::KernelAlreadyRegistered` if the id is taken.
    pub fn register_metadata(&self, metadata: KernelMetadata) -> Result<()> {
        let id = metadata.id.clone();
        let mut kernels = self.kernels.write().expect("registry lock poisoned");

        if kernels.contains_key(&id) {
            return Err(EngineError::KernelAlreadyRegistered(id));
        }

        debug!(kernel_id = %id, domain = %metadata.domain, "Registering kernel");
        kernels.insert(id, metadata);
        Ok(())
    }

    /// Get a kernel's metadata by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<KernelMetadata> {
        let kernels = self.kernels.read().expect("registry lock poisoned");
        kernels.get(id).cloned()
    }

    /// Check if a kernel exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        let kernels = self.kernels.read().expect("registry lock poisoned");
        kernels.contains_key(id)
    }

    /// Get all kernel IDs, sorted.
    #[must_use]
    pub fn kernel_ids(&self) -> Vec<String> {
        let kernels = self.kernels.read().expect("registry lock poisoned");
        let mut ids: Vec<String> = kernels.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Get kernels by domain.
    #[must_use]
    pub fn by_domain(&self, domain: Domain) -> Vec<KernelMetadata> {
        let kernels = self.kernels.read().expect("registry lock poisoned");
        kernels
            .values()
            .filter(|m| m.domain == domain)
            .cloned()
            .collect()
    }

    /// Get kernels by mode.
    #[must_use]
    pub fn by_mode(&self, mode: KernelMode) -> Vec<KernelMetadata> {
        let kernels = self.kernels.read().expect("registry lock poisoned");
        kernels
            .values()
            .filter(|m| m.mode == mode)
            .cloned()
            .collect()
    }

    /// Get registry statistics.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let kernels = self.kernels.read().expect("registry lock poisoned");

        let mut by_domain: HashMap<Domain, usize> = HashMap::new();
        let mut batch_kernels = 0;
        let mut query_kernels = 0;

        for metadata in kernels.values() {
            *by_domain.entry(metadata.domain).or_default() += 1;
            match metadata.mode {
                KernelMode::Batch => batch_kernels += 1,
                KernelMode::Query => query_kernels += 1,
            }
        }

        RegistryStats {
            total: kernels.len(),
            batch_kernels,
            query_kernels,
            by_domain,
        }
    }

    /// Total number of registered kernels.
    #[must_use]
    pub fn total_count(&self) -> usize {
        let kernels = self.kernels.read().expect("registry lock poisoned");
        kernels.len()
    }

    /// Clear all registered kernels.
    pub fn clear(&self) {
        let mut kernels = self.kernels.write().expect("registry lock poisoned");
        kernels.clear();
        info!("Cleared kernel registry");
    }

    /// Unregister a kernel by ID.
    pub fn unregister(&self, id: &str) -> bool {
        let mut kernels = self.kernels.write().expect("registry lock poisoned");
        if kernels.remove(id).is_some() {
            debug!(kernel_id = %id, "Unregistered kernel");
            true
        } else {
            warn!(kernel_id = %id, "Attempted to unregister non-existent kernel");
            false
        }
    }
}

impl Default for KernelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_metadata(id: &str, domain: Domain) -> KernelMetadata {
        KernelMetadata::batch(id, domain)
    }

    #[test]
    fn test_registry_creation() {
        let registry = KernelRegistry::new();
        assert_eq!(registry.total_count(), 0);
    }

    #[test]
    fn test_registration() {
        let registry = KernelRegistry::new();
        registry
            .register_metadata(test_metadata("forensics/smurfing", Domain::Forensics))
            .unwrap();

        assert_eq!(registry.total_count(), 1);
        assert!(registry.contains("forensics/smurfing"));
        assert!(registry.get("forensics/smurfing").is_some());
    }

    #[test]
    fn test_duplicate_registration() {
        let registry = KernelRegistry::new();
        registry
            .register_metadata(test_metadata("forensics/smurfing", Domain::Forensics))
            .unwrap();

        let result = registry.register_metadata(test_metadata("forensics/smurfing", Domain::Forensics));
        assert!(matches!(
            result,
            Err(EngineError::KernelAlreadyRegistered(_))
        ));
    }

    #[test]
    fn test_by_domain() {
        let registry = KernelRegistry::new();
        registry
            .register_metadata(test_metadata("forensics/smurfing", Domain::Forensics))
            .unwrap();
        registry
            .register_metadata(test_metadata("graph/structural-clones", Domain::GraphAnalytics))
            .unwrap();

        assert_eq!(registry.by_domain(Domain::Forensics).len(), 1);
        assert_eq!(registry.by_domain(Domain::GraphAnalytics).len(), 1);
        assert_eq!(registry.by_domain(Domain::Core).len(), 0);
    }

    #[test]
    fn test_by_mode() {
        let registry = KernelRegistry::new();
        registry
            .register_metadata(KernelMetadata::batch("forensics/smurfing", Domain::Forensics))
            .unwrap();
        registry
            .register_metadata(KernelMetadata::query(
                "graph/structural-clones",
                Domain::GraphAnalytics,
            ))
            .unwrap();

        assert_eq!(registry.by_mode(KernelMode::Batch).len(), 1);
        assert_eq!(registry.by_mode(KernelMode::Query).len(), 1);
    }

    #[test]
    fn test_stats() {
        let registry = KernelRegistry::new();
        registry
            .register_metadata(KernelMetadata::batch("forensics/smurfing", Domain::Forensics))
            .unwrap();
        registry
            .register_metadata(KernelMetadata::query(
                "graph/structural-clones",
                Domain::GraphAnalytics,
            ))
            .unwrap();

        let stats = registry.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.batch_kernels, 1);
        assert_eq!(stats.query_kernels, 1);
        assert_eq!(stats.by_domain.get(&Domain::Forensics), Some(&1));
    }

    #[test]
    fn test_unregister() {
        let registry = KernelRegistry::new();
        registry
            .register_metadata(test_metadata("forensics/smurfing", Domain::Forensics))
            .unwrap();

        assert!(registry.unregister("forensics/smurfing"));
        assert!(!registry.contains("forensics/smurfing"));
        assert!(!registry.unregister("forensics/smurfing"));
    }
}
