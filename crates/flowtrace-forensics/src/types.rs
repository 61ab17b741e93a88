//! Transaction records, detection flags, and analysis result types.

use chrono::{DateTime, Utc};
use flowtrace_graph::types::AccountGraph;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use uuid::Uuid;

/// A single money-movement record.
///
/// Loaded once per analysis run and never mutated. A timestamp that failed
/// to parse upstream arrives as `None`; such rows still contribute an edge
/// but are excluded from time-window math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier.
    pub transaction_id: String,
    /// Sending account.
    pub sender_id: String,
    /// Receiving account.
    pub receiver_id: String,
    /// Transferred amount. Carried for reporting; never used in detection.
    pub amount: f64,
    /// Transaction time, if it parsed.
    pub timestamp: Option<DateTime<Utc>>,
}

/// Build the directed account graph for a transaction set.
///
/// One node per distinct account, one edge per distinct (sender, receiver)
/// pair. An empty ledger yields an empty graph.
#[must_use]
pub fn transaction_graph(transactions: &[Transaction]) -> AccountGraph {
    AccountGraph::from_edges(
        transactions
            .iter()
            .map(|tx| (tx.sender_id.as_str(), tx.receiver_id.as_str())),
    )
}

/// Accounts flagged by the four pattern detectors.
///
/// A fixed record of four sets rather than a keyed container, so the
/// categories are closed at compile time. Sets are pairwise non-exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSet {
    /// Accounts on a short directed cycle.
    pub cycles: BTreeSet<String>,
    /// Accounts receiving a high-velocity transaction burst.
    pub fan_in: BTreeSet<String>,
    /// Accounts sending a high-velocity transaction burst.
    pub fan_out: BTreeSet<String>,
    /// Low-activity accounts chained into layering paths.
    pub shells: BTreeSet<String>,
}

impl FlagSet {
    /// Total number of flagged accounts across all categories (with overlap).
    #[must_use]
    pub fn total_flags(&self) -> usize {
        self.cycles.len() + self.fan_in.len() + self.fan_out.len() + self.shells.len()
    }
}

/// Risk tier derived from an account's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score of zero.
    Low,
    /// Score above zero but below the high-risk threshold.
    Medium,
    /// Score at or above the high-risk threshold.
    High,
}

impl RiskLevel {
    /// Derive the tier for a score, using the fixed threshold of 40.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        if score >= 40 {
            RiskLevel::High
        } else if score > 0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Per-account risk assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEntry {
    /// Account id.
    pub account_id: String,
    /// Risk score in `[0, 100]`.
    pub score: u32,
    /// Risk tier consistent with the score.
    pub risk_level: RiskLevel,
    /// Comma-joined pattern labels, or `"Normal"`.
    pub reasons: String,
}

/// Pattern category of a fraud ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingPattern {
    /// Connected component of cycle-flagged accounts.
    Cycle,
    /// Aggregator and its senders.
    FanIn,
    /// Disperser and its receivers.
    FanOut,
    /// Connected component of shell-flagged accounts.
    ShellLayering,
}

impl RingPattern {
    /// Wire name of the pattern.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RingPattern::Cycle => "cycle",
            RingPattern::FanIn => "fan_in",
            RingPattern::FanOut => "fan_out",
            RingPattern::ShellLayering => "shell_layering",
        }
    }
}

/// A cluster of accounts believed to operate together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRing {
    /// Sequential id, e.g. `RING_001`.
    pub ring_id: String,
    /// Member accounts, sorted lexicographically.
    #[serde(rename = "member_accounts")]
    pub members: Vec<String>,
    /// Pattern category that formed the ring.
    pub pattern_type: RingPattern,
    /// Mean member risk score, rounded to 1 decimal.
    pub risk_score: f64,
}

/// Outcome of ring assembly: the rings plus the account-to-ring mapping.
///
/// The mapping records at most one ring per account; earlier passes win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RingAssignment {
    /// Assembled rings in creation order.
    pub rings: Vec<FraudRing>,
    /// Account id to owning ring id.
    pub membership: HashMap<String, String>,
}

/// A flagged account in the structured report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspiciousAccount {
    /// Account id.
    pub account_id: String,
    /// Risk score as reported.
    pub suspicion_score: f64,
    /// Ordered, deduplicated pattern labels.
    pub detected_patterns: Vec<String>,
    /// Owning ring, if the account was claimed by one.
    pub ring_id: Option<String>,
}

/// Network-level counters for the analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStats {
    /// Nodes in the account graph.
    pub total_nodes: usize,
    /// Distinct directed edges in the account graph.
    pub total_edges: usize,
    /// Transactions analyzed.
    pub total_transactions: usize,
    /// Accounts with a high risk tier.
    pub high_risk_count: usize,
    /// Accounts with a medium risk tier.
    pub medium_risk_count: usize,
    /// Accounts flagged by the cycle detector.
    pub cycles_detected: usize,
    /// Accounts flagged as fan-in aggregators.
    pub fan_in_detected: usize,
    /// Accounts flagged as fan-out dispersers.
    pub fan_out_detected: usize,
    /// Accounts flagged as shell layers.
    pub shells_detected: usize,
}

/// Headline numbers for the analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Nodes in the account graph.
    pub total_accounts_analyzed: usize,
    /// Accounts with a positive score.
    pub suspicious_accounts_flagged: usize,
    /// Rings assembled.
    pub fraud_rings_detected: usize,
    /// Pipeline wall time, rounded to 2 decimals.
    pub processing_time_seconds: f64,
}

/// Complete output of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique id of this run.
    pub analysis_id: Uuid,
    /// Detector flags.
    pub flags: FlagSet,
    /// Per-account risk assessments.
    pub risk_entries: Vec<RiskEntry>,
    /// Assembled fraud rings.
    pub fraud_rings: Vec<FraudRing>,
    /// Flagged accounts, highest score first.
    pub suspicious_accounts: Vec<SuspiciousAccount>,
    /// Network-level counters.
    pub stats: NetworkStats,
    /// Headline numbers.
    pub summary: AnalysisSummary,
}
