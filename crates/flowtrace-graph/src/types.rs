//! Common graph types and data structures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Directed graph over account-id strings.
///
/// Nodes are interned to dense indices; parallel edges are collapsed, so an
/// edge `(a, b)` exists at most once regardless of how many transactions
/// flowed from `a` to `b`. Node and adjacency order follow insertion order,
/// which makes traversals deterministic for a given input sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountGraph {
    /// Account ids in insertion order.
    nodes: Vec<String>,
    /// Account id to node index.
    index: HashMap<String, usize>,
    /// Outgoing adjacency per node.
    out_edges: Vec<Vec<usize>>,
    /// Incoming adjacency per node.
    in_edges: Vec<Vec<usize>>,
    /// Number of distinct directed edges.
    num_edges: usize,
}

impl AccountGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a graph from an edge list.
    ///
    /// Duplicate edges are collapsed; every endpoint becomes a node.
    #[must_use]
    pub fn from_edges<'a>(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut graph = Self::empty();
        for (src, dst) in edges {
            graph.add_edge(src, dst);
        }
        graph
    }

    /// Add a node, returning its index. Existing nodes are reused.
    pub fn add_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(id.to_string());
        self.index.insert(id.to_string(), idx);
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        idx
    }

    /// Add a directed edge, interning both endpoints. Duplicates are ignored.
    pub fn add_edge(&mut self, src: &str, dst: &str) {
        let s = self.add_node(src);
        let d = self.add_node(dst);
        if self.out_edges[s].contains(&d) {
            return;
        }
        self.out_edges[s].push(d);
        self.in_edges[d].push(s);
        self.num_edges += 1;
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.num_edges
    }

    /// Check whether an account id is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up the node index for an account id.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The account id at a node index.
    #[must_use]
    pub fn account_id(&self, idx: usize) -> &str {
        &self.nodes[idx]
    }

    /// Iterate account ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    /// Successors of a node.
    #[must_use]
    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.out_edges[idx]
    }

    /// Predecessors of a node.
    #[must_use]
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        &self.in_edges[idx]
    }

    /// Out-degree of a node.
    #[must_use]
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_edges[idx].len()
    }

    /// In-degree of a node.
    #[must_use]
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_edges[idx].len()
    }

    /// Check whether the directed edge `src -> dst` exists.
    #[must_use]
    pub fn has_edge(&self, src: usize, dst: usize) -> bool {
        self.out_edges[src].contains(&dst)
    }

    /// Iterate all directed edges as `(source, target)` index pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.out_edges
            .iter()
            .enumerate()
            .flat_map(|(src, dsts)| dsts.iter().map(move |&dst| (src, dst)))
    }

    /// Induced subgraph on the given members, preserving edge direction.
    ///
    /// Members absent from the graph are skipped. Node order in the result
    /// follows the order of `members`.
    #[must_use]
    pub fn induced_subgraph<'a>(&self, members: impl IntoIterator<Item = &'a str>) -> Self {
        let mut sub = Self::empty();
        let mut kept: Vec<usize> = Vec::new();
        for id in members {
            if let Some(idx) = self.index_of(id) {
                if !sub.contains(id) {
                    sub.add_node(id);
                    kept.push(idx);
                }
            }
        }
        for &src in &kept {
            for &dst in self.successors(src) {
                let dst_id = self.account_id(dst);
                if sub.contains(dst_id) {
                    sub.add_edge(self.account_id(src), dst_id);
                }
            }
        }
        sub
    }

    /// Calculate graph density.
    #[must_use]
    pub fn density(&self) -> f64 {
        if self.node_count() <= 1 {
            return 0.0;
        }
        let max_edges = self.node_count() * (self.node_count() - 1);
        self.num_edges as f64 / max_edges as f64
    }
}

/// Result of a structural clone search.
///
/// Union of the nodes and edges of every ego network found isomorphic to
/// the reference shape, including the reference itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloneSearchResult {
    /// Account ids belonging to matching subgraphs, sorted.
    pub match_nodes: Vec<String>,
    /// Directed `(source, target)` edges of matching subgraphs, sorted.
    pub match_edges: Vec<(String, String)>,
    /// Number of matched accounts.
    pub match_count: usize,
}

impl CloneSearchResult {
    /// An empty result (no matches, e.g. unknown target).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges() {
        let graph = AccountGraph::from_edges(vec![("A", "B"), ("A", "C"), ("B", "C"), ("C", "A")]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 4);
        let a = graph.index_of("A").unwrap();
        assert_eq!(graph.out_degree(a), 2);
        assert_eq!(graph.in_degree(a), 1);
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let graph = AccountGraph::from_edges(vec![("A", "B"), ("A", "B"), ("A", "B")]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_empty_graph() {
        let graph = AccountGraph::empty();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.contains("A"));
        assert_eq!(graph.density(), 0.0);
    }

    #[test]
    fn test_has_edge_direction() {
        let graph = AccountGraph::from_edges(vec![("A", "B")]);
        let a = graph.index_of("A").unwrap();
        let b = graph.index_of("B").unwrap();

        assert!(graph.has_edge(a, b));
        assert!(!graph.has_edge(b, a));
    }

    #[test]
    fn test_induced_subgraph() {
        let graph =
            AccountGraph::from_edges(vec![("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")]);
        let sub = graph.induced_subgraph(["A", "B", "C"]);

        assert_eq!(sub.node_count(), 3);
        assert_eq!(sub.edge_count(), 3);
        assert!(!sub.contains("D"));
    }

    #[test]
    fn test_induced_subgraph_unknown_member() {
        let graph = AccountGraph::from_edges(vec![("A", "B")]);
        let sub = graph.induced_subgraph(["A", "Z"]);

        assert_eq!(sub.node_count(), 1);
        assert_eq!(sub.edge_count(), 0);
    }

    #[test]
    fn test_density() {
        // Complete directed graph of 3 nodes has 6 edges, density = 1.0
        let graph = AccountGraph::from_edges(vec![
            ("A", "B"),
            ("B", "A"),
            ("A", "C"),
            ("C", "A"),
            ("B", "C"),
            ("C", "B"),
        ]);
        assert!((graph.density() - 1.0).abs() < 1e-9);
    }
}
