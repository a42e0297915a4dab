//! Signature extractor (C3): projects each path hop into `(Action, Gender)`.

use petgraph::graph::NodeIndex;

use crate::graph::{EdgeLabel, Gender, Graph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Parent,
    Child,
    Spouse,
}

pub type Signature = Vec<(Action, Gender)>;

/// Extracts the signature along `path`. Returns `None` if some consecutive
/// hop matches none of `parent_of`/`spouse_of` in either direction — a
/// data-integrity error per spec.md §4.3, which the caller surfaces as the
/// `error` outcome.
pub fn extract(graph: &Graph, path: &[NodeIndex]) -> Option<Signature> {
    let mut signature = Vec::with_capacity(path.len().saturating_sub(1));
    for window in path.windows(2) {
        let (u, v) = (window[0], window[1]);
        let step = if graph.has_edge(v, u, EdgeLabel::ParentOf) {
            (Action::Parent, graph.gender(v))
        } else if graph.has_edge(u, v, EdgeLabel::ParentOf) {
            (Action::Child, graph.gender(v))
        } else if graph.has_edge(u, v, EdgeLabel::SpouseOf) {
            (Action::Spouse, graph.gender(v))
        } else {
            return None;
        };
        signature.push(step);
    }
    Some(signature)
}

/// A signature composed solely of `Parent` or solely of `Child` steps —
/// no siblings, no spouses. Used by the rank decorator (C8) to skip
/// decoration for pure lineal ancestors/descendants (spec.md §4.8 step 5).
pub fn is_pure_lineal(signature: &Signature) -> bool {
    !signature.is_empty()
        && (signature.iter().all(|(a, _)| *a == Action::Parent)
            || signature.iter().all(|(a, _)| *a == Action::Child))
}
