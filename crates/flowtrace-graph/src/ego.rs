//! Ego-network extraction.

use crate::types::AccountGraph;
use std::collections::VecDeque;

/// Extract the ego network of `center` at the given hop radius.
///
/// Reachability treats edges as undirected; the returned subgraph keeps the
/// original edge directions. Returns `None` if `center` is not in the graph.
#[must_use]
pub fn ego_network(graph: &AccountGraph, center: &str, radius: usize) -> Option<AccountGraph> {
    let start = graph.index_of(center)?;

    let mut depth = vec![usize::MAX; graph.node_count()];
    let mut order: Vec<usize> = Vec::new();
    let mut queue = VecDeque::new();
    depth[start] = 0;
    queue.push_back(start);

    while let Some(node) = queue.pop_front() {
        order.push(node);
        if depth[node] == radius {
            continue;
        }
        for &next in graph.successors(node).iter().chain(graph.predecessors(node)) {
            if depth[next] == usize::MAX {
                depth[next] = depth[node] + 1;
                queue.push_back(next);
            }
        }
    }

    let members: Vec<&str> = order.iter().map(|&idx| graph.account_id(idx)).collect();
    Some(graph.induced_subgraph(members))
}
