//! # Flowtrace Forensics
//!
//! Money-movement pattern detection kernels for the Flowtrace engine.
//!
//! ## Kernels
//!
//! - `SmurfingDetection` - fan-in / fan-out bursts within a rolling window
//! - `CycleDetection` - bounded DFS for directed cycles of length 3-5
//! - `ShellDetection` - chained low-activity pass-through accounts
//! - `RiskScoring` - weighted flag aggregation into 0-100 scores
//! - `RingAssembly` - flag clustering into rings with category precedence
//! - `AnalysisPipeline` - the full sequence on one transaction set
//!
//! All detection is structural and temporal; transaction amounts are
//! carried for reporting but never weighted.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cycles;
pub mod messages;
pub mod pipeline;
pub mod report;
pub mod rings;
pub mod scoring;
pub mod shells;
pub mod smurfing;
pub mod types;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cycles::{CycleConfig, CycleDetection};
    pub use crate::messages::{AnalyzeLedgerInput, AnalyzeLedgerOutput};
    pub use crate::pipeline::{AnalysisPipeline, PipelineConfig};
    pub use crate::rings::RingAssembly;
    pub use crate::scoring::RiskScoring;
    pub use crate::shells::{ShellConfig, ShellDetection};
    pub use crate::smurfing::{FanActivity, SmurfingConfig, SmurfingDetection};
    pub use crate::types::{
        AnalysisReport, AnalysisSummary, FlagSet, FraudRing, NetworkStats, RingAssignment,
        RingPattern, RiskEntry, RiskLevel, SuspiciousAccount, Transaction,
    };
}

/// Register all forensics kernels with a registry.
pub fn register_all(
    registry: &flowtrace_core::registry::KernelRegistry,
) -> flowtrace_core::error::Result<()> {
    use flowtrace_core::traits::AnalyticKernel;

    tracing::info!("Registering forensics kernels");

    registry.register_metadata(smurfing::SmurfingDetection::new().metadata().clone())?;
    registry.register_metadata(cycles::CycleDetection::new().metadata().clone())?;
    registry.register_metadata(shells::ShellDetection::new().metadata().clone())?;
    registry.register_metadata(scoring::RiskScoring::new().metadata().clone())?;
    registry.register_metadata(rings::RingAssembly::new().metadata().clone())?;
    registry.register_metadata(pipeline::AnalysisPipeline::new().metadata().clone())?;

    tracing::info!("Registered 6 forensics kernels");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtrace_core::domain::Domain;
    use flowtrace_core::registry::KernelRegistry;

    #[test]
    fn test_register_all() {
        let registry = KernelRegistry::new();
        register_all(&registry).expect("Failed to register forensics kernels");
        assert_eq!(registry.total_count(), 6);
        assert_eq!(registry.by_domain(Domain::Forensics).len(), 6);
    }
}
