//! Per-account risk scoring.

use crate::types::{FlagSet, RiskEntry, RiskLevel};
use flowtrace_core::{domain::Domain, kernel::KernelMetadata, traits::AnalyticKernel};
use flowtrace_graph::types::AccountGraph;

/// Score contribution of a cycle flag.
pub const CYCLE_WEIGHT: u32 = 40;
/// Score contribution of a fan-in flag.
pub const FAN_IN_WEIGHT: u32 = 35;
/// Score contribution of a fan-out flag.
pub const FAN_OUT_WEIGHT: u32 = 35;
/// Score contribution of a shell flag.
pub const SHELL_WEIGHT: u32 = 25;
/// Score ceiling.
pub const MAX_SCORE: u32 = 100;

/// Risk scoring kernel.
///
/// Pure function over the flag set: fixed weights per category, capped at
/// 100, with human-readable reasons assembled in the fixed category order
/// cycle, fan-in, fan-out, shell. Total over every graph node; unflagged
/// nodes score 0.
#[derive(Debug, Clone)]
pub struct RiskScoring {
    metadata: KernelMetadata,
}

impl Default for RiskScoring {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskScoring {
    /// Create a new risk scoring kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("forensics/risk-scoring", Domain::Forensics)
                .with_description("Weighted flag aggregation into 0-100 risk scores")
                .with_throughput(500_000)
                .with_latency_us(5.0),
        }
    }

    /// Score every node in the graph.
    #[must_use]
    pub fn compute(graph: &AccountGraph, flags: &FlagSet) -> Vec<RiskEntry> {
        graph
            .nodes()
            .map(|account| Self::score_account(account, flags))
            .collect()
    }

    /// Score a single account.
    #[must_use]
    pub fn score_account(account: &str, flags: &FlagSet) -> RiskEntry {
        let mut score = 0u32;
        let mut reasons: Vec<&str> = Vec::new();

        if flags.cycles.contains(account) {
            score += CYCLE_WEIGHT;
            reasons.push("Cycle (Ring)");
        }
        if flags.fan_in.contains(account) {
            score += FAN_IN_WEIGHT;
            reasons.push("Fan-in (Aggregator)");
        }
        if flags.fan_out.contains(account) {
            score += FAN_OUT_WEIGHT;
            reasons.push("Fan-out (Disperser)");
        }
        if flags.shells.contains(account) {
            score += SHELL_WEIGHT;
            reasons.push("Shell Layer");
        }

        let score = score.min(MAX_SCORE);
        RiskEntry {
            account_id: account.to_string(),
            score,
            risk_level: RiskLevel::from_score(score),
            reasons: if reasons.is_empty() {
                "Normal".to_string()
            } else {
                reasons.join(", ")
            },
        }
    }
}

impl AnalyticKernel for RiskScoring {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}
