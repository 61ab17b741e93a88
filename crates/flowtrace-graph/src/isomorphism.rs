//! Structural clone search.
//!
//! Finds every neighborhood in the account graph whose connection pattern is
//! identical to a target account's ego network:
//! - `IsomorphismTester` - pluggable exact-match algorithm
//! - `BacktrackingMatcher` - candidate-pair backtracking with explicit undo
//! - `StructuralCloneSearch` - query kernel combining degree pre-filtering,
//!   ego extraction, and the matcher

use crate::ego::ego_network;
use crate::types::{AccountGraph, CloneSearchResult};
use flowtrace_core::{domain::Domain, kernel::KernelMetadata, traits::AnalyticKernel};
use std::collections::BTreeSet;
use std::fmt::Debug;
use tracing::{info, warn};

// ============================================================================
// Isomorphism Tester
// ============================================================================

/// Exact directed-graph isomorphism test.
///
/// Implementations decide whether a structure-preserving bijection exists
/// between the nodes of two graphs that maps edges to edges, respecting
/// direction. The matcher is a seam: a faster algorithm can be substituted
/// without touching the surrounding search.
pub trait IsomorphismTester: Send + Sync + Debug {
    /// Returns true if `a` and `b` are isomorphic as directed graphs.
    fn are_isomorphic(&self, a: &AccountGraph, b: &AccountGraph) -> bool;
}

/// Backtracking isomorphism matcher.
///
/// Assigns nodes of `a` to nodes of `b` one at a time, most-connected nodes
/// first, pruning on in/out degree and on adjacency consistency with every
/// pair already assigned. Worst case is exponential in node count; callers
/// keep candidate subgraphs small via degree and size pre-filters.
#[derive(Debug, Clone, Default)]
pub struct BacktrackingMatcher;

impl BacktrackingMatcher {
    /// Create a new matcher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Candidate pair consistency check against all prior assignments.
    fn compatible(
        a: &AccountGraph,
        b: &AccountGraph,
        order: &[usize],
        assigned: usize,
        mapping: &[Option<usize>],
        u: usize,
        v: usize,
    ) -> bool {
        if a.in_degree(u) != b.in_degree(v) || a.out_degree(u) != b.out_degree(v) {
            return false;
        }
        for &w in &order[..assigned] {
            let mw = match mapping[w] {
                Some(mw) => mw,
                None => continue,
            };
            if a.has_edge(u, w) != b.has_edge(v, mw) {
                return false;
            }
            if a.has_edge(w, u) != b.has_edge(mw, v) {
                return false;
            }
        }
        true
    }

    fn assign(
        a: &AccountGraph,
        b: &AccountGraph,
        order: &[usize],
        pos: usize,
        mapping: &mut [Option<usize>],
        used: &mut [bool],
    ) -> bool {
        if pos == order.len() {
            return true;
        }
        let u = order[pos];
        for v in 0..b.node_count() {
            if used[v] || !Self::compatible(a, b, order, pos, mapping, u, v) {
                continue;
            }
            mapping[u] = Some(v);
            used[v] = true;
            if Self::assign(a, b, order, pos + 1, mapping, used) {
                return true;
            }
            // undo and try the next candidate
            mapping[u] = None;
            used[v] = false;
        }
        false
    }
}

impl IsomorphismTester for BacktrackingMatcher {
    fn are_isomorphic(&self, a: &AccountGraph, b: &AccountGraph) -> bool {
        let n = a.node_count();
        if n != b.node_count() || a.edge_count() != b.edge_count() {
            return false;
        }
        if n == 0 {
            return true;
        }

        // Degree-sequence multisets must agree before anything expensive.
        let mut degrees_a: Vec<(usize, usize)> =
            (0..n).map(|i| (a.in_degree(i), a.out_degree(i))).collect();
        let mut degrees_b: Vec<(usize, usize)> =
            (0..n).map(|i| (b.in_degree(i), b.out_degree(i))).collect();
        degrees_a.sort_unstable();
        degrees_b.sort_unstable();
        if degrees_a != degrees_b {
            return false;
        }

        // Assign the most constrained nodes first.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(a.in_degree(i) + a.out_degree(i)));

        let mut mapping = vec![None; n];
        let mut used = vec![false; n];
        Self::assign(a, b, &order, 0, &mut mapping, &mut used)
    }
}

// ============================================================================
// Structural Clone Search Kernel
// ============================================================================

/// Structural clone search kernel.
///
/// Given a target account and a hop radius, extracts the target's ego
/// network and hunts the whole graph for nodes whose same-radius ego
/// networks are exactly isomorphic to it. A cheap in/out-degree filter and
/// a node-count check keep the expensive isomorphism test to a small
/// candidate set. An unknown target yields an empty result, not an error.
#[derive(Debug)]
pub struct StructuralCloneSearch {
    metadata: KernelMetadata,
    tester: Box<dyn IsomorphismTester>,
}

impl Default for StructuralCloneSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralCloneSearch {
    /// Create a new clone search kernel with the backtracking matcher.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tester(Box::new(BacktrackingMatcher::new()))
    }

    /// Create a clone search kernel with a custom isomorphism tester.
    #[must_use]
    pub fn with_tester(tester: Box<dyn IsomorphismTester>) -> Self {
        Self {
            metadata: KernelMetadata::query("graph/structural-clones", Domain::GraphAnalytics)
                .with_description("Ego-network isomorphism (structural clone) search")
                .with_throughput(100)
                .with_latency_us(50_000.0),
            tester,
        }
    }

    /// Find all structural clones of `target`'s ego network at `hops` radius.
    ///
    /// Returns the union of nodes and edges over every matching ego network,
    /// the target's own included.
    #[must_use]
    pub fn compute(&self, graph: &AccountGraph, target: &str, hops: usize) -> CloneSearchResult {
        let Some(target_idx) = graph.index_of(target) else {
            warn!(target_node = %target, "clone search target not in graph");
            return CloneSearchResult::empty();
        };

        let reference = match ego_network(graph, target, hops) {
            Some(reference) => reference,
            None => return CloneSearchResult::empty(),
        };
        let reference_size = reference.node_count();

        info!(
            target_node = %target,
            hops,
            reference_size,
            graph_nodes = graph.node_count(),
            "clone search started"
        );

        let target_in = graph.in_degree(target_idx);
        let target_out = graph.out_degree(target_idx);

        let mut match_nodes: BTreeSet<String> = BTreeSet::new();
        let mut match_edges: BTreeSet<(String, String)> = BTreeSet::new();

        for candidate in 0..graph.node_count() {
            if graph.in_degree(candidate) != target_in || graph.out_degree(candidate) != target_out
            {
                continue;
            }
            let Some(candidate_ego) = ego_network(graph, graph.account_id(candidate), hops) else {
                continue;
            };
            if candidate_ego.node_count() != reference_size {
                continue;
            }
            if self.tester.are_isomorphic(&reference, &candidate_ego) {
                for node in candidate_ego.nodes() {
                    match_nodes.insert(node.to_string());
                }
                for (src, dst) in candidate_ego.edges() {
                    match_edges.insert((
                        candidate_ego.account_id(src).to_string(),
                        candidate_ego.account_id(dst).to_string(),
                    ));
                }
            }
        }

        info!(
            match_node_count = match_nodes.len(),
            match_edge_count = match_edges.len(),
            "clone search complete"
        );

        CloneSearchResult {
            match_count: match_nodes.len(),
            match_nodes: match_nodes.into_iter().collect(),
            match_edges: match_edges.into_iter().collect(),
        }
    }
}

impl AnalyticKernel for StructuralCloneSearch {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}
