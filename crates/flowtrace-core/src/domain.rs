//! Domain definitions for kernel categorization.
//!
//! Kernels are organized into domains representing distinct analytical areas.
//! Domains are used for:
//! - Kernel discovery and organization
//! - Feature naming for audit trails

use serde::{Deserialize, Serialize};
use std::fmt;

/// Analytical domain for kernel categorization.
///
/// Each domain represents a distinct area of functionality:
/// - Graph analytics (ego networks, components, structural clone search)
/// - Forensics (pattern detectors, risk scoring, ring assembly)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Domain {
    /// Graph analytics: components, ego networks, structural clone search
    GraphAnalytics,

    /// Forensics: money-movement pattern detection, risk scoring, ring assembly
    Forensics,

    /// Core: test kernels and infrastructure validation
    Core,
}

impl Domain {
    /// All available domains.
    pub const ALL: &'static [Domain] = &[Domain::GraphAnalytics, Domain::Forensics, Domain::Core];

    /// Returns the domain name as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Domain::GraphAnalytics => "GraphAnalytics",
            Domain::Forensics => "Forensics",
            Domain::Core => "Core",
        }
    }

    /// Parse a domain from a string.
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GraphAnalytics" => Some(Domain::GraphAnalytics),
            "Forensics" => Some(Domain::Forensics),
            "Core" => Some(Domain::Core),
            _ => None,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Feature strings for audit trails and kernel discovery.
///
/// Format: `Domain.Feature` (e.g., `Forensics.CycleDetection`)
pub mod features {
    // GraphAnalytics domain
    /// Structural clone (subgraph isomorphism) search
    pub const GRAPH_STRUCTURAL_CLONES: &str = "GraphAnalytics.StructuralClones";

    // Forensics domain
    /// Smurfing (fan-in / fan-out velocity) detection
    pub const FORENSICS_SMURFING: &str = "Forensics.Smurfing";
    /// Short directed cycle detection
    pub const FORENSICS_CYCLES: &str = "Forensics.CycleDetection";
    /// Layered shell account detection
    pub const FORENSICS_SHELLS: &str = "Forensics.ShellChains";
    /// Per-account risk scoring
    pub const FORENSICS_RISK: &str = "Forensics.RiskScoring";
    /// Fraud ring clustering
    pub const FORENSICS_RINGS: &str = "Forensics.RingAssembly";
    /// Full analysis pipeline
    pub const FORENSICS_PIPELINE: &str = "Forensics.AnalysisPipeline";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_all_count() {
        assert_eq!(Domain::ALL.len(), 3);
    }

    #[test]
    fn test_domain_from_str() {
        assert_eq!(Domain::from_str("GraphAnalytics"), Some(Domain::GraphAnalytics));
        assert_eq!(Domain::from_str("Forensics"), Some(Domain::Forensics));
        assert_eq!(Domain::from_str("Unknown"), None);
    }

    #[test]
    fn test_domain_display() {
        assert_eq!(Domain::GraphAnalytics.to_string(), "GraphAnalytics");
        assert_eq!(Domain::Forensics.to_string(), "Forensics");
    }
}
