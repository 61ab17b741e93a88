//! Structured report building.
//!
//! Turns flags, risk entries, and ring assignments into the suspicious
//! account list and run summary.

use crate::types::{AnalysisSummary, FlagSet, RiskEntry, SuspiciousAccount};
use std::collections::{HashMap, HashSet, VecDeque};

use flowtrace_graph::types::AccountGraph;

/// Longest simple cycle reported in a `cycle_length_N` label.
const MAX_LABEL_CYCLE_LEN: usize = 6;

/// Build the suspicious account list.
///
/// One entry per account with a positive score. Patterns are assembled in
/// the fixed category order, deduplicated preserving first occurrence, and
/// the list is sorted by score descending with account id as the tie-break.
#[must_use]
pub fn build_suspicious_accounts(
    graph: &AccountGraph,
    flags: &FlagSet,
    entries: &[RiskEntry],
    membership: &HashMap<String, String>,
) -> Vec<SuspiciousAccount> {
    let cycle_subgraph = graph.induced_subgraph(flags.cycles.iter().map(String::as_str));

    let mut accounts: Vec<SuspiciousAccount> = entries
        .iter()
        .filter(|entry| entry.score > 0)
        .map(|entry| SuspiciousAccount {
            account_id: entry.account_id.clone(),
            suspicion_score: f64::from(entry.score),
            detected_patterns: detected_patterns(&cycle_subgraph, flags, &entry.account_id),
            ring_id: membership.get(&entry.account_id).cloned(),
        })
        .collect();

    accounts.sort_by(|a, b| {
        b.suspicion_score
            .partial_cmp(&a.suspicion_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.account_id.cmp(&b.account_id))
    });

    accounts
}

/// Assemble the ordered, deduplicated pattern labels for one account.
fn detected_patterns(
    cycle_subgraph: &AccountGraph,
    flags: &FlagSet,
    account: &str,
) -> Vec<String> {
    let mut patterns: Vec<String> = Vec::new();

    if flags.cycles.contains(account) {
        match cycle_length_through(cycle_subgraph, account, MAX_LABEL_CYCLE_LEN) {
            Some(len) => patterns.push(format!("cycle_length_{len}")),
            None => patterns.push("cycle".to_string()),
        }
    }
    if flags.fan_in.contains(account) {
        patterns.push("high_velocity".to_string());
        patterns.push("fan_in_aggregator".to_string());
    }
    if flags.fan_out.contains(account) {
        patterns.push("high_velocity".to_string());
        patterns.push("fan_out_disperser".to_string());
    }
    if flags.shells.contains(account) {
        patterns.push("shell_layer".to_string());
    }

    let mut seen = HashSet::new();
    patterns.retain(|p| seen.insert(p.clone()));
    patterns
}

/// Length of the shortest simple cycle through `account`, if within bound.
///
/// The shortest cycle through a node is one outgoing edge plus the shortest
/// directed path back, so a BFS from each successor suffices; BFS paths are
/// necessarily simple.
fn cycle_length_through(graph: &AccountGraph, account: &str, max_len: usize) -> Option<usize> {
    let start = graph.index_of(account)?;
    let mut best: Option<usize> = None;

    for &first in graph.successors(start) {
        let len = if first == start {
            1 // self-loop
        } else {
            match shortest_path_len(graph, first, start) {
                Some(back) => back + 1,
                None => continue,
            }
        };
        if len <= max_len && best.map_or(true, |b| len < b) {
            best = Some(len);
        }
    }

    best
}

/// Shortest directed path length from `from` to `to`, in edges.
fn shortest_path_len(graph: &AccountGraph, from: usize, to: usize) -> Option<usize> {
    let mut dist = vec![usize::MAX; graph.node_count()];
    let mut queue = VecDeque::new();
    dist[from] = 0;
    queue.push_back(from);

    while let Some(node) = queue.pop_front() {
        if node == to {
            return Some(dist[node]);
        }
        for &next in graph.successors(node) {
            if dist[next] == usize::MAX {
                dist[next] = dist[node] + 1;
                queue.push_back(next);
            }
        }
    }
    None
}

/// Build the run summary.
#[must_use]
pub fn build_summary(
    graph: &AccountGraph,
    suspicious_count: usize,
    ring_count: usize,
    processing_time_seconds: f64,
) -> AnalysisSummary {
    AnalysisSummary {
        total_accounts_analyzed: graph.node_count(),
        suspicious_accounts_flagged: suspicious_count,
        fraud_rings_detected: ring_count,
        processing_time_seconds: (processing_time_seconds * 100.0).round() / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::RiskScoring;

    fn flags_with_cycle(members: &[&str]) -> FlagSet {
        FlagSet {
            cycles: members.iter().map(|s| s.to_string()).collect(),
            ..FlagSet::default()
        }
    }

    #[test]
    fn test_cycle_length_label_triangle() {
        let graph = AccountGraph::from_edges(vec![("A", "B"), ("B", "C"), ("C", "A")]);
        let flags = flags_with_cycle(&["A", "B", "C"]);
        let entries = RiskScoring::compute(&graph, &flags);

        let accounts = build_suspicious_accounts(&graph, &flags, &entries, &HashMap::new());

        assert_eq!(accounts.len(), 3);
        for account in &accounts {
            assert_eq!(account.detected_patterns, vec!["cycle_length_3"]);
        }
    }

    #[test]
    fn test_cycle_fallback_label() {
        // Flag without an actual cycle in the induced subgraph
        let graph = AccountGraph::from_edges(vec![("A", "B")]);
        let flags = flags_with_cycle(&["A"]);
        let entries = RiskScoring::compute(&graph, &flags);

        let accounts = build_suspicious_accounts(&graph, &flags, &entries, &HashMap::new());

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].detected_patterns, vec!["cycle"]);
    }

    #[test]
    fn test_high_velocity_deduplicated() {
        let graph = AccountGraph::from_edges(vec![("A", "B"), ("B", "A")]);
        let flags = FlagSet {
            fan_in: ["A".to_string()].into_iter().collect(),
            fan_out: ["A".to_string()].into_iter().collect(),
            ..FlagSet::default()
        };
        let entries = RiskScoring::compute(&graph, &flags);

        let accounts = build_suspicious_accounts(&graph, &flags, &entries, &HashMap::new());

        let a = accounts.iter().find(|s| s.account_id == "A").unwrap();
        assert_eq!(
            a.detected_patterns,
            vec!["high_velocity", "fan_in_aggregator", "fan_out_disperser"]
        );
    }

    #[test]
    fn test_sorted_by_score_then_id() {
        let graph = AccountGraph::from_edges(vec![("B", "A"), ("A", "C"), ("C", "D")]);
        let flags = FlagSet {
            // B and A shell-flagged (25 each), C cycle-flagged (40)
            shells: ["A", "B"].iter().map(|s| s.to_string()).collect(),
            cycles: ["C".to_string()].into_iter().collect(),
            ..FlagSet::default()
        };
        let entries = RiskScoring::compute(&graph, &flags);

        let accounts = build_suspicious_accounts(&graph, &flags, &entries, &HashMap::new());

        let ids: Vec<&str> = accounts.iter().map(|s| s.account_id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_zero_score_accounts_excluded() {
        let graph = AccountGraph::from_edges(vec![("A", "B")]);
        let entries = RiskScoring::compute(&graph, &FlagSet::default());

        let accounts =
            build_suspicious_accounts(&graph, &FlagSet::default(), &entries, &HashMap::new());
        assert!(accounts.is_empty());
    }

    #[test]
    fn test_ring_id_attached() {
        let graph = AccountGraph::from_edges(vec![("A", "B"), ("B", "C"), ("C", "A")]);
        let flags = flags_with_cycle(&["A", "B", "C"]);
        let entries = RiskScoring::compute(&graph, &flags);
        let membership: HashMap<String, String> = [("A", "RING_001"), ("B", "RING_001")]
            .iter()
            .map(|(a, r)| (a.to_string(), r.to_string()))
            .collect();

        let accounts = build_suspicious_accounts(&graph, &flags, &entries, &membership);

        let a = accounts.iter().find(|s| s.account_id == "A").unwrap();
        assert_eq!(a.ring_id.as_deref(), Some("RING_001"));
        let c = accounts.iter().find(|s| s.account_id == "C").unwrap();
        assert!(c.ring_id.is_none());
    }

    #[test]
    fn test_summary_rounding() {
        let graph = AccountGraph::from_edges(vec![("A", "B")]);
        let summary = build_summary(&graph, 1, 0, 0.123_456);

        assert_eq!(summary.total_accounts_analyzed, 2);
        assert!((summary.processing_time_seconds - 0.12).abs() < 1e-9);
    }

    #[test]
    fn test_summary_empty_graph() {
        let summary = build_summary(&AccountGraph::empty(), 0, 0, 0.0);
        assert_eq!(summary.total_accounts_analyzed, 0);
        assert_eq!(summary.suspicious_accounts_flagged, 0);
        assert_eq!(summary.fraud_rings_detected, 0);
    }
}
