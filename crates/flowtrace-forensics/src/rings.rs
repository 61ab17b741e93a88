//! Fraud ring assembly.

use crate::types::{FlagSet, FraudRing, RingAssignment, RingPattern};
use flowtrace_core::{domain::Domain, kernel::KernelMetadata, traits::AnalyticKernel};
use flowtrace_graph::components::weakly_connected_components;
use flowtrace_graph::types::AccountGraph;
use std::collections::{BTreeSet, HashMap};

/// Ring assembly kernel.
///
/// Clusters flagged accounts into named rings in four strictly ordered,
/// irreversible passes: cycle components, fan-in clusters, fan-out
/// clusters, shell components. An account claimed by an earlier pass is
/// never reassigned; later rings may still list it as a member, but its
/// mapping stays with the first claim. Ring ids are assigned from a
/// sequential counter in creation order.
#[derive(Debug, Clone)]
pub struct RingAssembly {
    metadata: KernelMetadata,
}

/// Local assembly state threaded through the four passes.
#[derive(Debug, Default)]
struct Assembler {
    rings: Vec<FraudRing>,
    membership: HashMap<String, String>,
    counter: usize,
}

impl Assembler {
    fn next_ring_id(&mut self) -> String {
        self.counter += 1;
        format!("RING_{:03}", self.counter)
    }

    /// Record a ring; `claim_all` maps every member, otherwise only
    /// members without a prior claim are newly mapped.
    fn push_ring(
        &mut self,
        members: Vec<String>,
        pattern: RingPattern,
        scores: &HashMap<String, u32>,
        claim_all: bool,
    ) {
        let ring_id = self.next_ring_id();
        for member in &members {
            if claim_all {
                self.membership.insert(member.clone(), ring_id.clone());
            } else {
                self.membership
                    .entry(member.clone())
                    .or_insert_with(|| ring_id.clone());
            }
        }
        self.rings.push(FraudRing {
            ring_id,
            risk_score: mean_score(&members, scores),
            members,
            pattern_type: pattern,
        });
    }
}

/// Mean member risk score, rounded to 1 decimal. 0.0 for an empty list.
fn mean_score(members: &[String], scores: &HashMap<String, u32>) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let total: u32 = members
        .iter()
        .map(|m| scores.get(m).copied().unwrap_or(0))
        .sum();
    let mean = f64::from(total) / members.len() as f64;
    (mean * 10.0).round() / 10.0
}

impl Default for RingAssembly {
    fn default() -> Self {
        Self::new()
    }
}

impl RingAssembly {
    /// Create a new ring assembly kernel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: KernelMetadata::batch("forensics/ring-assembly", Domain::Forensics)
                .with_description("Flag clustering into fraud rings with category precedence")
                .with_throughput(50_000)
                .with_latency_us(100.0),
        }
    }

    /// Assemble fraud rings from the flag set.
    ///
    /// `scores` maps account ids to their risk scores; missing accounts
    /// count as 0 toward a ring's mean.
    #[must_use]
    pub fn compute(
        graph: &AccountGraph,
        flags: &FlagSet,
        scores: &HashMap<String, u32>,
    ) -> RingAssignment {
        let mut assembler = Assembler::default();

        // 1. Cycle rings: weak components of the cycle-induced subgraph.
        Self::component_rings(
            graph,
            &flags.cycles,
            RingPattern::Cycle,
            scores,
            true,
            &mut assembler,
        );

        // 2. Fan-in rings: aggregator plus its senders.
        Self::cluster_rings(
            graph,
            &flags.fan_in,
            RingPattern::FanIn,
            scores,
            AccountGraph::predecessors,
            &mut assembler,
        );

        // 3. Fan-out rings: disperser plus its receivers.
        Self::cluster_rings(
            graph,
            &flags.fan_out,
            RingPattern::FanOut,
            scores,
            AccountGraph::successors,
            &mut assembler,
        );

        // 4. Shell rings: weak components of the shell-induced subgraph.
        Self::component_rings(
            graph,
            &flags.shells,
            RingPattern::ShellLayering,
            scores,
            false,
            &mut assembler,
        );

        RingAssignment {
            rings: assembler.rings,
            membership: assembler.membership,
        }
    }

    /// Rings from weakly connected components of an induced subgraph.
    fn component_rings(
        graph: &AccountGraph,
        flagged: &BTreeSet<String>,
        pattern: RingPattern,
        scores: &HashMap<String, u32>,
        claim_all: bool,
        assembler: &mut Assembler,
    ) {
        if flagged.is_empty() {
            return;
        }
        let induced = graph.induced_subgraph(flagged.iter().map(String::as_str));
        for component in weakly_connected_components(&induced) {
            if component.len() < 2 {
                continue;
            }
            let mut members = component;
            members.sort();
            assembler.push_ring(members, pattern, scores, claim_all);
        }
    }

    /// Rings from a hub account plus its neighbors on one side.
    fn cluster_rings(
        graph: &AccountGraph,
        flagged: &BTreeSet<String>,
        pattern: RingPattern,
        scores: &HashMap<String, u32>,
        neighbors: impl for<'g> Fn(&'g AccountGraph, usize) -> &'g [usize],
        assembler: &mut Assembler,
    ) {
        for hub in flagged {
            let Some(idx) = graph.index_of(hub) else {
                continue;
            };
            let mut cluster: BTreeSet<&str> = neighbors(graph, idx)
                .iter()
                .map(|&n| graph.account_id(n))
                .collect();
            cluster.insert(hub);

            if cluster.len() >= 3 && !assembler.membership.contains_key(hub.as_str()) {
                let members: Vec<String> = cluster.into_iter().map(str::to_string).collect();
                assembler.push_ring(members, pattern, scores, false);
            }
        }
    }
}

impl AnalyticKernel for RingAssembly {
    fn metadata(&self) -> &KernelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores_of(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs.iter().map(|(id, s)| (id.to_string(), *s)).collect()
    }

    fn cycle_flags(accounts: &[&str]) -> FlagSet {
        FlagSet {
            cycles: accounts.iter().map(|s| s.to_string()).collect(),
            ..FlagSet::default()
        }
    }

    #[test]
    fn test_ring_assembly_metadata() {
        let kernel = RingAssembly::new();
        assert_eq!(kernel.metadata().id, "forensics/ring-assembly");
        assert_eq!(kernel.metadata().domain, Domain::Forensics);
    }

    #[test]
    fn test_cycle_component_ring() {
        let graph = AccountGraph::from_edges(vec![("A", "B"), ("B", "C"), ("C", "A")]);
        let flags = cycle_flags(&["A", "B", "C"]);
        let scores = scores_of(&[("A", 40), ("B", 40), ("C", 40)]);

        let assignment = RingAssembly::compute(&graph, &flags, &scores);

        assert_eq!(assignment.rings.len(), 1);
        let ring = &assignment.rings[0];
        assert_eq!(ring.ring_id, "RING_001");
        assert_eq!(ring.pattern_type, RingPattern::Cycle);
        assert_eq!(ring.members, vec!["A", "B", "C"]);
        assert!((ring.risk_score - 40.0).abs() < 1e-9);
        assert_eq!(assignment.membership.get("B"), Some(&"RING_001".to_string()));
    }

    #[test]
    fn test_fan_in_cluster_ring() {
        let graph =
            AccountGraph::from_edges(vec![("S1", "AGG"), ("S2", "AGG"), ("S3", "AGG")]);
        let flags = FlagSet {
            fan_in: ["AGG".to_string()].into_iter().collect(),
            ..FlagSet::default()
        };
        let scores = scores_of(&[("AGG", 35)]);

        let assignment = RingAssembly::compute(&graph, &flags, &scores);

        assert_eq!(assignment.rings.len(), 1);
        let ring = &assignment.rings[0];
        assert_eq!(ring.pattern_type, RingPattern::FanIn);
        assert_eq!(ring.members, vec!["AGG", "S1", "S2", "S3"]);
        // 35 / 4 members = 8.75, rounded to 1 decimal
        assert!((ring.risk_score - 8.8).abs() < 1e-9);
    }

    #[test]
    fn test_fan_in_cluster_too_small() {
        let graph = AccountGraph::from_edges(vec![("S1", "AGG")]);
        let flags = FlagSet {
            fan_in: ["AGG".to_string()].into_iter().collect(),
            ..FlagSet::default()
        };

        let assignment = RingAssembly::compute(&graph, &flags, &HashMap::new());
        assert!(assignment.rings.is_empty());
    }

    #[test]
    fn test_cycle_precedence_over_fan_in() {
        // AGG is on a cycle and also a fan-in hub: it must stay in the
        // cycle ring and no fan-in ring may be formed around it.
        let graph = AccountGraph::from_edges(vec![
            ("AGG", "B"),
            ("B", "C"),
            ("C", "AGG"),
            ("S1", "AGG"),
            ("S2", "AGG"),
        ]);
        let mut flags = cycle_flags(&["AGG", "B", "C"]);
        flags.fan_in.insert("AGG".to_string());

        let assignment = RingAssembly::compute(&graph, &flags, &HashMap::new());

        assert_eq!(assignment.rings.len(), 1);
        assert_eq!(assignment.rings[0].pattern_type, RingPattern::Cycle);
        assert_eq!(
            assignment.membership.get("AGG"),
            Some(&"RING_001".to_string())
        );
    }

    #[test]
    fn test_fan_in_ring_keeps_claimed_members_in_prior_ring() {
        // S1 is part of a cycle ring; the later fan-in ring lists S1 as a
        // member but does not steal its mapping.
        let graph = AccountGraph::from_edges(vec![
            ("S1", "X"),
            ("X", "Y"),
            ("Y", "S1"),
            ("S1", "AGG"),
            ("S2", "AGG"),
            ("S3", "AGG"),
        ]);
        let mut flags = cycle_flags(&["S1", "X", "Y"]);
        flags.fan_in.insert("AGG".to_string());

        let assignment = RingAssembly::compute(&graph, &flags, &HashMap::new());

        assert_eq!(assignment.rings.len(), 2);
        let fan_ring = &assignment.rings[1];
        assert_eq!(fan_ring.pattern_type, RingPattern::FanIn);
        assert!(fan_ring.members.contains(&"S1".to_string()));
        // S1's mapping still points at the cycle ring
        assert_eq!(assignment.membership.get("S1"), Some(&"RING_001".to_string()));
        assert_eq!(assignment.membership.get("AGG"), Some(&"RING_002".to_string()));
    }

    #[test]
    fn test_fan_out_cluster_ring() {
        let graph =
            AccountGraph::from_edges(vec![("DISP", "R1"), ("DISP", "R2"), ("DISP", "R3")]);
        let flags = FlagSet {
            fan_out: ["DISP".to_string()].into_iter().collect(),
            ..FlagSet::default()
        };

        let assignment = RingAssembly::compute(&graph, &flags, &HashMap::new());

        assert_eq!(assignment.rings.len(), 1);
        assert_eq!(assignment.rings[0].pattern_type, RingPattern::FanOut);
        assert_eq!(assignment.rings[0].members, vec!["DISP", "R1", "R2", "R3"]);
    }

    #[test]
    fn test_shell_component_ring_lowest_precedence() {
        let graph = AccountGraph::from_edges(vec![("A", "B"), ("B", "C")]);
        let flags = FlagSet {
            shells: ["A", "B", "C"].iter().map(|s| s.to_string()).collect(),
            ..FlagSet::default()
        };

        let assignment = RingAssembly::compute(&graph, &flags, &HashMap::new());

        assert_eq!(assignment.rings.len(), 1);
        assert_eq!(assignment.rings[0].pattern_type, RingPattern::ShellLayering);
        assert_eq!(assignment.rings[0].members, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_ring_ids_sequential_across_passes() {
        let graph = AccountGraph::from_edges(vec![
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("S1", "AGG"),
            ("S2", "AGG"),
            ("S3", "AGG"),
        ]);
        let mut flags = cycle_flags(&["A", "B", "C"]);
        flags.fan_in.insert("AGG".to_string());

        let assignment = RingAssembly::compute(&graph, &flags, &HashMap::new());

        let ids: Vec<&str> = assignment.rings.iter().map(|r| r.ring_id.as_str()).collect();
        assert_eq!(ids, vec!["RING_001", "RING_002"]);
    }

    #[test]
    fn test_singleton_component_no_ring() {
        // One flagged account with no flagged neighbors forms no ring
        let graph = AccountGraph::from_edges(vec![("A", "B")]);
        let flags = cycle_flags(&["A"]);

        let assignment = RingAssembly::compute(&graph, &flags, &HashMap::new());
        assert!(assignment.rings.is_empty());
        assert!(assignment.membership.is_empty());
    }

    #[test]
    fn test_empty_flags() {
        let graph = AccountGraph::from_edges(vec![("A", "B")]);
        let assignment = RingAssembly::compute(&graph, &FlagSet::default(), &HashMap::new());

        assert!(assignment.rings.is_empty());
    }
}
