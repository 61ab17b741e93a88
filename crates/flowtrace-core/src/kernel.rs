//! Kernel metadata and execution modes.
//!
//! Every analytical kernel carries a metadata record describing its
//! identity, execution mode, and performance expectations.

use crate::domain::Domain;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kernel execution mode.
///
/// Determines how the kernel is invoked:
/// - `Batch`: one stage of the fixed analysis pipeline
/// - `Query`: on-demand lookup over an already-built graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KernelMode {
    /// Batch kernel mode (pipeline stage, runs once per analysis).
    Batch,

    /// Query kernel mode (on-demand, runs against the finished graph).
    Query,
}

impl KernelMode {
    /// Returns true if this is a batch kernel.
    #[must_use]
    pub const fn is_batch(&self) -> bool {
        matches!(self, KernelMode::Batch)
    }

    /// Returns true if this is a query kernel.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self, KernelMode::Query)
    }

    /// Returns the mode name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            KernelMode::Batch => "batch",
            KernelMode::Query => "query",
        }
    }
}

impl fmt::Display for KernelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kernel metadata.
///
/// Contains identity and performance expectations for a kernel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KernelMetadata {
    /// Unique kernel identifier (e.g., "forensics/cycle-detection").
    pub id: String,

    /// Kernel execution mode.
    pub mode: KernelMode,

    /// Analytical domain.
    pub domain: Domain,

    /// Human-readable description.
    pub description: String,

    /// Expected throughput in transactions or nodes per second.
    pub expected_throughput: u64,

    /// Target latency in microseconds.
    pub target_latency_us: f64,

    /// Version of the kernel implementation.
    pub version: u32,
}

impl KernelMetadata {
    /// Create a new batch kernel metadata.
    #[must_use]
    pub fn batch(id: impl Into<String>, domain: Domain) -> Self {
        Self {
            id: id.into(),
            mode: KernelMode::Batch,
            domain,
            description: String::new(),
            expected_throughput: 10_000,
            target_latency_us: 50.0,
            version: 1,
        }
    }

    /// Create a new query kernel metadata.
    #[must_use]
    pub fn query(id: impl Into<String>, domain: Domain) -> Self {
        Self {
            id: id.into(),
            mode: KernelMode::Query,
            domain,
            description: String::new(),
            expected_throughput: 1_000,
            target_latency_us: 10_000.0,
            version: 1,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the expected throughput.
    #[must_use]
    pub fn with_throughput(mut self, ops_per_sec: u64) -> Self {
        self.expected_throughput = ops_per_sec;
        self
    }

    /// Set the target latency.
    #[must_use]
    pub fn with_latency_us(mut self, latency_us: f64) -> Self {
        self.target_latency_us = latency_us;
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Returns the feature string for audit trails.
    ///
    /// Format: `Domain.KernelName` where KernelName is extracted from the ID.
    #[must_use]
    pub fn feature_string(&self) -> String {
        let name = self.id.rsplit('/').next().unwrap_or(&self.id);
        let name = to_pascal_case(name);
        format!("{}.{}", self.domain, name)
    }

    /// Returns the full kernel ID path.
    #[must_use]
    pub fn full_id(&self) -> String {
        format!("{}/{}", self.domain.as_str().to_lowercase(), self.id)
    }
}

impl Default for KernelMetadata {
    fn default() -> Self {
        Self::batch("unnamed", Domain::Core)
    }
}

/// Convert a kebab-case or snake_case string to PascalCase.
fn to_pascal_case(s: &str) -> String {
    s.split(|c| c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_mode_properties() {
        assert!(KernelMode::Batch.is_batch());
        assert!(!KernelMode::Batch.is_query());
        assert!(KernelMode::Query.is_query());
        assert!(!KernelMode::Query.is_batch());
    }

    #[test]
    fn test_kernel_metadata_batch() {
        let meta = KernelMetadata::batch("cycle-detection", Domain::Forensics)
            .with_description("Short directed cycle detection")
            .with_throughput(100_000)
            .with_latency_us(10.0);

        assert_eq!(meta.id, "cycle-detection");
        assert_eq!(meta.mode, KernelMode::Batch);
        assert_eq!(meta.domain, Domain::Forensics);
        assert_eq!(meta.expected_throughput, 100_000);
    }

    #[test]
    fn test_kernel_metadata_query() {
        let meta = KernelMetadata::query("structural-clones", Domain::GraphAnalytics);

        assert_eq!(meta.mode, KernelMode::Query);
        assert_eq!(meta.domain, Domain::GraphAnalytics);
    }

    #[test]
    fn test_feature_string() {
        let meta = KernelMetadata::batch("forensics/cycle-detection", Domain::Forensics);
        assert_eq!(meta.feature_string(), "Forensics.CycleDetection");

        let meta = KernelMetadata::query("graph/structural-clones", Domain::GraphAnalytics);
        assert_eq!(meta.feature_string(), "GraphAnalytics.StructuralClones");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("smurfing"), "Smurfing");
        assert_eq!(to_pascal_case("cycle-detection"), "CycleDetection");
        assert_eq!(to_pascal_case("shell_chains"), "ShellChains");
    }
}
