//! Inheritance cycle detection
//!
//! Schemas become nodes, declared parents become edges (root marker and
//! unknown parents excluded). Strongly connected components with more than
//! one member, or with a self edge, are cycles. Only the first cycle of each
//! weakly connected component is reported.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::bundle::ROOT_MARKER;

use super::view::SchemaView;

/// Directed schema -> parent graph
pub struct InheritanceGraph {
    graph: DiGraph<String, ()>,
}

impl InheritanceGraph {
    pub fn build(schemas: &[SchemaView]) -> Self {
        let mut graph = DiGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();

        for schema in schemas {
            index
                .entry(schema.name.as_str())
                .or_insert_with(|| graph.add_node(schema.name.clone()));
        }

        for schema in schemas {
            let from = index[schema.name.as_str()];
            for parent in &schema.inherit {
                if parent == ROOT_MARKER {
                    continue;
                }
                if let Some(&to) = index.get(parent.as_str()) {
                    if graph.find_edge(from, to).is_none() {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// One cycle per weakly connected component, each as a closed name path
    /// (`["A", "B", "A"]`)
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut components = UnionFind::new(self.graph.node_count());
        for edge in self.graph.edge_references() {
            components.union(edge.source().index(), edge.target().index());
        }

        let mut cyclic: Vec<Vec<NodeIndex>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|mut scc| {
                scc.sort();
                scc
            })
            .collect();
        cyclic.sort();

        let mut reported = HashSet::new();
        let mut cycles = Vec::new();
        for scc in cyclic {
            if !reported.insert(components.find(scc[0].index())) {
                continue;
            }
            cycles.push(
                self.cycle_path(&scc)
                    .into_iter()
                    .map(|n| self.graph[n].clone())
                    .collect(),
            );
        }
        cycles
    }

    /// Shortest closed walk through the lowest-indexed member of `scc`
    fn cycle_path(&self, scc: &[NodeIndex]) -> Vec<NodeIndex> {
        let start = scc[0];
        if self.graph.contains_edge(start, start) {
            return vec![start, start];
        }

        let members: HashSet<NodeIndex> = scc.iter().copied().collect();
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            let mut next: Vec<NodeIndex> = self
                .graph
                .neighbors(node)
                .filter(|n| members.contains(n))
                .collect();
            next.sort();

            for succ in next {
                if succ == start {
                    let mut path = vec![node];
                    let mut current = node;
                    while let Some(&prev) = parent.get(&current) {
                        path.push(prev);
                        current = prev;
                    }
                    path.reverse();
                    path.push(start);
                    return path;
                }
                if let std::collections::hash_map::Entry::Vacant(slot) = parent.entry(succ) {
                    slot.insert(node);
                    queue.push_back(succ);
                }
            }
        }

        // Unreachable for a true SCC; fall back to listing members
        let mut path = scc.to_vec();
        path.push(start);
        path
    }
}
