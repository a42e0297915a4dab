//! Graph builder (C1) and shortest-path finder (C2).

use std::collections::{HashMap, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use serde::Deserialize;

/// A person's gender. Defaults to `M` when absent from a node record
/// (spec.md §4.1: "gender defaults to `M` on read").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    M,
    F,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::M
    }
}

/// Abstract 2-D layout position. Units are unspecified; only relative
/// comparisons against the same-row threshold matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Position {
    pub x: i64,
    pub y: i64,
}

/// An input person node.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub position: Option<Position>,
}

/// An input labelled edge. Unrecognized `label`s are tolerated and ignored
/// by the builder (spec.md §4.1).
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeLabel {
    ParentOf,
    SpouseOf,
}

struct Person {
    gender: Gender,
    position: Option<Position>,
}

/// The in-memory, per-request kinship graph: a directed multi-label graph
/// over persons, plus an undirected adjacency list (in edge-insertion
/// order) used only for shortest-path search.
pub struct Graph {
    graph: DiGraph<Person, EdgeLabel>,
    by_id: HashMap<String, NodeIndex>,
    undirected_adjacency: HashMap<NodeIndex, Vec<NodeIndex>>,
}

impl Graph {
    /// Materialize a graph from node/edge lists. Edges referring to
    /// unknown ids are tolerated (they become dangling and are dropped).
    pub fn build(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Self {
        let mut graph = DiGraph::new();
        let mut by_id = HashMap::with_capacity(nodes.len());
        for node in nodes {
            let idx = graph.add_node(Person {
                gender: node.gender,
                position: node.position,
            });
            by_id.insert(node.id.clone(), idx);
        }

        let mut undirected_adjacency: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        let mut link = |graph: &mut DiGraph<Person, EdgeLabel>,
                        adjacency: &mut HashMap<NodeIndex, Vec<NodeIndex>>,
                        u: NodeIndex,
                        v: NodeIndex,
                        label: EdgeLabel| {
            graph.add_edge(u, v, label);
            adjacency.entry(u).or_default().push(v);
            adjacency.entry(v).or_default().push(u);
        };

        for edge in edges {
            let (Some(&u), Some(&v)) = (by_id.get(&edge.source), by_id.get(&edge.target)) else {
                continue;
            };
            match edge.label.as_str() {
                "parent_of" => link(&mut graph, &mut undirected_adjacency, u, v, EdgeLabel::ParentOf),
                "spouse_of" => {
                    graph.add_edge(u, v, EdgeLabel::SpouseOf);
                    graph.add_edge(v, u, EdgeLabel::SpouseOf);
                    undirected_adjacency.entry(u).or_default().push(v);
                    undirected_adjacency.entry(v).or_default().push(u);
                }
                _ => {}
            }
        }

        Self {
            graph,
            by_id,
            undirected_adjacency,
        }
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn gender(&self, idx: NodeIndex) -> Gender {
        self.graph[idx].gender
    }

    pub(crate) fn position(&self, idx: NodeIndex) -> Option<Position> {
        self.graph[idx].position
    }

    pub(crate) fn has_edge(&self, u: NodeIndex, v: NodeIndex, label: EdgeLabel) -> bool {
        self.graph
            .edges_connecting(u, v)
            .any(|e| *e.weight() == label)
    }

    /// Find parents of `id` (predecessors via `parent_of`).
    pub(crate) fn parents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .filter(|&p| self.has_edge(p, idx, EdgeLabel::ParentOf))
            .collect()
    }

    /// Find children of `id` (successors via `parent_of`).
    pub(crate) fn children_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .filter(|&c| self.has_edge(idx, c, EdgeLabel::ParentOf))
            .collect()
    }

    /// Find spouses of `id`, checking both edge directions.
    pub(crate) fn spouses_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .neighbors_undirected(idx)
            .filter(|&n| {
                self.has_edge(idx, n, EdgeLabel::SpouseOf) || self.has_edge(n, idx, EdgeLabel::SpouseOf)
            })
            .collect()
    }

    /// Shortest path between `source` and `target` over the undirected
    /// projection of the graph, or `None` if they are in different
    /// connected components.
    ///
    /// BFS visits neighbors in edge-insertion order (the order in which
    /// `build` linked them), so the result is deterministic for a fixed
    /// input node/edge ordering: the first shortest path discovered wins,
    /// per spec.md's "BFS in insertion order" tie-break.
    pub fn shortest_path(&self, source: NodeIndex, target: NodeIndex) -> Option<Vec<NodeIndex>> {
        if source == target {
            return Some(vec![source]);
        }
        let mut visited = std::collections::HashSet::new();
        let mut predecessor: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::new();
        visited.insert(source);
        queue.push_back(source);
        while let Some(u) = queue.pop_front() {
            let Some(neighbors) = self.undirected_adjacency.get(&u) else {
                continue;
            };
            for &v in neighbors {
                if visited.insert(v) {
                    predecessor.insert(v, u);
                    if v == target {
                        let mut path = vec![target];
                        let mut cur = target;
                        while let Some(&p) = predecessor.get(&cur) {
                            path.push(p);
                            cur = p;
                        }
                        path.reverse();
                        return Some(path);
                    }
                    queue.push_back(v);
                }
            }
        }
        None
    }

    /// Whether `source` and `target` are in the same connected component.
    pub fn connected(&self, source: NodeIndex, target: NodeIndex) -> bool {
        self.shortest_path(source, target).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, gender: Gender, pos: Option<(i64, i64)>) -> NodeRecord {
        NodeRecord {
            id: id.to_string(),
            gender,
            position: pos.map(|(x, y)| Position { x, y }),
        }
    }

    fn edge(source: &str, target: &str, label: &str) -> EdgeRecord {
        EdgeRecord {
            source: source.to_string(),
            target: target.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn spouse_edges_are_bidirectional() {
        let nodes = vec![node("a", Gender::M, None), node("b", Gender::F, None)];
        let edges = vec![edge("a", "b", "spouse_of")];
        let g = Graph::build(&nodes, &edges);
        let a = g.node_index("a").unwrap();
        let b = g.node_index("b").unwrap();
        assert!(g.has_edge(a, b, EdgeLabel::SpouseOf));
        assert!(g.has_edge(b, a, EdgeLabel::SpouseOf));
    }

    #[test]
    fn unknown_edge_labels_are_ignored() {
        let nodes = vec![node("a", Gender::M, None), node("b", Gender::F, None)];
        let edges = vec![edge("a", "b", "sibling_of")];
        let g = Graph::build(&nodes, &edges);
        let a = g.node_index("a").unwrap();
        let b = g.node_index("b").unwrap();
        assert!(!g.connected(a, b));
    }

    #[test]
    fn dangling_edges_are_tolerated() {
        let nodes = vec![node("a", Gender::M, None)];
        let edges = vec![edge("a", "ghost", "parent_of")];
        let g = Graph::build(&nodes, &edges);
        assert!(g.node_index("ghost").is_none());
    }

    #[test]
    fn shortest_path_deterministic_bfs() {
        let nodes = vec![
            node("p", Gender::M, None),
            node("me", Gender::M, None),
            node("bro", Gender::M, None),
        ];
        let edges = vec![edge("p", "me", "parent_of"), edge("p", "bro", "parent_of")];
        let g = Graph::build(&nodes, &edges);
        let me = g.node_index("me").unwrap();
        let bro = g.node_index("bro").unwrap();
        let p = g.node_index("p").unwrap();
        let path = g.shortest_path(me, bro).unwrap();
        assert_eq!(path, vec![me, p, bro]);
    }

    #[test]
    fn disconnected_pair_has_no_path() {
        let nodes = vec![node("a", Gender::M, None), node("b", Gender::F, None)];
        let g = Graph::build(&nodes, &[]);
        let a = g.node_index("a").unwrap();
        let b = g.node_index("b").unwrap();
        assert!(!g.connected(a, b));
    }
}
