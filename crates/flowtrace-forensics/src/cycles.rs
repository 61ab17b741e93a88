//! Short directed cycle detection.

use flowtrace_core::{domain::Domain, kernel::KernelMetadata, traits::AnalyticKernel};
use flowtrace_graph::types::AccountGraph;
use std::collections::{BTreeSet, HashSet};

/// Configuration for the cycle detector.
#[derive(Debug, Clone)]
pub struct CycleConfig {
    /// Minimum cycle length in edges. Shorter cycles are ignored.
    pub min_cycle_len: usize,
    /// Maximum search depth in edges; bounds exploration to simple paths.
    pub max_depth: usize,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            min_cycle_len: 3,
            max_depth: 5,
        }
    }
}

/// Search state for a single start node.
enum RootSearch {
    /// Still exploring paths from this root.
    Exploring,
    /// A cycle through this root was found; the root is done.
    CycleFound,
}

/// Cycle detection kernel.
///
/// For each start node, runs a bounded depth-first search over simple paths
/// using an explicit stack of `(node, path_set, depth)`. A successor equal
/// to the start node at depth >= `min_cycle_len` closes a cycle; every node
/// on that path is flagged and the search moves to the next root (first
/// cycle wins, no enumeration). 1- and 2-cycles are not suspicious shapes
/// and are ignored.
#[derive(Debug, Clone)]
pub struct CycleDetection {
    metadata: KernelMetadata,
}

impl Default for CycleDetection {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleDetection {
    /// Create a new cycle detection kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("forensics/cycle-detection", Domain::Forensics)
                .with_description("Bounded DFS for directed cycles of length 3-5")
                .with_throughput(25_000)
                .with_latency_us(200.0),
        }
    }

    /// Flag every account participating in a short directed cycle.
    #[must_use]
    pub fn compute(graph: &AccountGraph, config: &CycleConfig) -> BTreeSet<String> {
        let mut flagged: HashSet<usize> = HashSet::new();

        for start in 0..graph.node_count() {
            // Already-flagged roots are skipped as a shortcut; their cycles
            // were recorded when some earlier root reached them.
            if flagged.contains(&start) {
                continue;
            }
            Self::search_root(graph, config, start, &mut flagged);
        }

        flagged
            .into_iter()
            .map(|idx| graph.account_id(idx).to_string())
            .collect()
    }

    /// Bounded DFS from one root; terminates on the first cycle found.
    fn search_root(
        graph: &AccountGraph,
        config: &CycleConfig,
        start: usize,
        flagged: &mut HashSet<usize>,
    ) {
        let mut state = RootSearch::Exploring;
        let mut stack: Vec<(usize, HashSet<usize>, usize)> =
            vec![(start, HashSet::from([start]), 1)];

        while let Some((node, path, depth)) = stack.pop() {
            for &next in graph.successors(node) {
                if next == start && depth >= config.min_cycle_len {
                    flagged.extend(path.iter().copied());
                    state = RootSearch::CycleFound;
                    break;
                }
                if !path.contains(&next) && depth < config.max_depth {
                    let mut extended = path.clone();
                    extended.insert(next);
                    stack.push((next, extended, depth + 1));
                }
            }
            if matches!(state, RootSearch::CycleFound) {
                break;
            }
        }
    }
}

impl AnalyticKernel for CycleDetection {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}
