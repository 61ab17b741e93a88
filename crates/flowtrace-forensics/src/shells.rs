//! Layered shell account detection.

use crate::types::Transaction;
use flowtrace_core::{domain::Domain, kernel::KernelMetadata, traits::AnalyticKernel};
use flowtrace_graph::types::AccountGraph;
use std::collections::{BTreeSet, HashMap};

/// Configuration for the shell detector.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Minimum total transaction count for a shell candidate.
    pub min_activity: usize,
    /// Maximum total transaction count for a shell candidate.
    pub max_activity: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            min_activity: 2,
            max_activity: 3,
        }
    }
}

/// Shell chain detection kernel.
///
/// A shell candidate is an account with near-minimal activity (total row
/// count as sender plus receiver inside the candidate band). Every candidate
/// with an edge to another candidate is flagged together with those
/// successors. Because each candidate is examined independently, multi-hop
/// layered chains accumulate flags across iterations without explicit chain
/// following; candidates are visited in sorted id order so the accumulation
/// is deterministic.
#[derive(Debug, Clone)]
pub struct ShellDetection {
    metadata: KernelMetadata,
}

impl Default for ShellDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellDetection {
    /// Create a new shell detection kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("forensics/shell-chains", Domain::Forensics)
                .with_description("Low-activity pass-through account chain detection")
                .with_throughput(100_000)
                .with_latency_us(50.0),
        }
    }

    /// Flag chained low-activity accounts.
    #[must_use]
    pub fn compute(
        transactions: &[Transaction],
        graph: &AccountGraph,
        config: &ShellConfig,
    ) -> BTreeSet<String> {
        let mut activity: HashMap<&str, usize> = HashMap::new();
        for tx in transactions {
            *activity.entry(tx.sender_id.as_str()).or_default() += 1;
            *activity.entry(tx.receiver_id.as_str()).or_default() += 1;
        }

        let candidates: BTreeSet<&str> = activity
            .iter()
            .filter(|(_, &count)| count >= config.min_activity && count <= config.max_activity)
            .map(|(&account, _)| account)
            .collect();

        let mut flagged = BTreeSet::new();
        for &candidate in &candidates {
            let Some(idx) = graph.index_of(candidate) else {
                continue;
            };
            let chained: Vec<&str> = graph
                .successors(idx)
                .iter()
                .map(|&next| graph.account_id(next))
                .filter(|next| candidates.contains(next))
                .collect();
            if !chained.is_empty() {
                flagged.insert(candidate.to_string());
                flagged.extend(chained.into_iter().map(str::to_string));
            }
        }

        flagged
    }
}

impl AnalyticKernel for ShellDetection {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction_graph;

    fn tx(id: u32, sender: &str, receiver: &str) -> Transaction {
        Transaction {
            transaction_id: format!("TX{id:04}"),
            sender_id: sender.to_string(),
            receiver_id: receiver.to_string(),
            amount: 250.0,
            timestamp: None,
        }
    }

    fn detect(txs: &[Transaction]) -> BTreeSet<String> {
        let graph = transaction_graph(txs);
        ShellDetection::compute(txs, &graph, &ShellConfig::default())
    }

    #[test]
    fn test_shell_detection_metadata() {
        let kernel = ShellDetection::new();
        assert_eq!(kernel.metadata().id, "forensics/shell-chains");
        assert_eq!(kernel.metadata().domain, Domain::Forensics);
    }

    #[test]
    fn test_candidate_pair_flagged() {
        // X->A, A->B, B->Y: A and B each have 2 rows, X and Y only 1
        let txs = vec![tx(1, "X", "A"), tx(2, "A", "B"), tx(3, "B", "Y")];
        let flagged = detect(&txs);

        assert_eq!(flagged, ["A", "B"].iter().map(|s| s.to_string()).collect());
    }

    #[test]
    fn test_multi_hop_chain_accumulates() {
        // Z->A, A->B, B->C, C->W: candidates A, B, C form a layered chain
        let txs = vec![
            tx(1, "Z", "A"),
            tx(2, "A", "B"),
            tx(3, "B", "C"),
            tx(4, "C", "W"),
        ];
        let flagged = detect(&txs);

        assert_eq!(
            flagged,
            ["A", "B", "C"].iter().map(|s| s.to_string()).collect()
        );
    }

    #[test]
    fn test_busy_account_not_candidate() {
        // HUB appears in 4 rows and cannot be a shell
        let txs = vec![
            tx(1, "HUB", "A"),
            tx(2, "HUB", "B"),
            tx(3, "C", "HUB"),
            tx(4, "D", "HUB"),
            tx(5, "A", "B"),
        ];
        let flagged = detect(&txs);

        assert!(!flagged.contains("HUB"));
        // A and B are candidates (2 rows each) and chained via A->B
        assert!(flagged.contains("A"));
        assert!(flagged.contains("B"));
    }

    #[test]
    fn test_isolated_candidates_not_flagged() {
        // A and B are low activity but never linked to another candidate
        let txs = vec![tx(1, "A", "X"), tx(2, "Y", "A"), tx(3, "B", "Z"), tx(4, "W", "B")];
        let flagged = detect(&txs);

        assert!(flagged.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(detect(&[]).is_empty());
    }
}
