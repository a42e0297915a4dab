//! Chain encoder (C4): collapses sibling triads and emits the canonical
//! comma-separated code chain, the closed alphabet of spec.md §3.

use petgraph::graph::NodeIndex;
use strum::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

use crate::graph::{Gender, Graph};
use crate::signature::{Action, Signature};

/// The `|y_source - y_target| < 100` same-row heuristic (spec.md §3, §9
/// Open Question: exposed as a named constant rather than a magic number).
pub const SAME_ROW_Y_THRESHOLD: i64 = 100;

/// One atom of the closed chain alphabet (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, IntoStaticStr, EnumIter)]
pub enum Atom {
    #[strum(serialize = "f")]
    Father,
    #[strum(serialize = "m")]
    Mother,
    #[strum(serialize = "s")]
    Son,
    #[strum(serialize = "d")]
    Daughter,
    #[strum(serialize = "h")]
    Husband,
    #[strum(serialize = "w")]
    Wife,
    #[strum(serialize = "ob")]
    ElderBrother,
    #[strum(serialize = "lb")]
    YoungerBrother,
    #[strum(serialize = "os")]
    ElderSister,
    #[strum(serialize = "ls")]
    YoungerSister,
    #[strum(serialize = "xb")]
    UnknownBrother,
    #[strum(serialize = "xs")]
    UnknownSister,
    #[strum(serialize = "s&o")]
    SonElder,
    #[strum(serialize = "s&l")]
    SonYounger,
    #[strum(serialize = "d&o")]
    DaughterElder,
    #[strum(serialize = "d&l")]
    DaughterYounger,
}

impl Atom {
    pub fn code(self) -> &'static str {
        self.into()
    }

    pub(crate) fn is_sibling(self) -> bool {
        matches!(
            self,
            Atom::ElderBrother
                | Atom::YoungerBrother
                | Atom::ElderSister
                | Atom::YoungerSister
                | Atom::UnknownBrother
                | Atom::UnknownSister
        )
    }
}

pub type Chain = Vec<Atom>;

/// Join a chain into its canonical comma-separated string form.
pub fn chain_to_string(chain: &[Atom]) -> String {
    chain.iter().map(Atom::code).collect::<Vec<_>>().join(",")
}

fn non_sibling_atom(action: Action, gender: Gender) -> Atom {
    match (action, gender) {
        (Action::Parent, Gender::M) => Atom::Father,
        (Action::Parent, Gender::F) => Atom::Mother,
        (Action::Child, Gender::M) => Atom::Son,
        (Action::Child, Gender::F) => Atom::Daughter,
        (Action::Spouse, Gender::M) => Atom::Husband,
        (Action::Spouse, Gender::F) => Atom::Wife,
    }
}

fn sibling_atom(gender: Gender, elder: bool) -> Atom {
    match (gender, elder) {
        (Gender::M, true) => Atom::ElderBrother,
        (Gender::M, false) => Atom::YoungerBrother,
        (Gender::F, true) => Atom::ElderSister,
        (Gender::F, false) => Atom::YoungerSister,
    }
}

fn unknown_sibling_atom(gender: Gender) -> Atom {
    match gender {
        Gender::M => Atom::UnknownBrother,
        Gender::F => Atom::UnknownSister,
    }
}

/// Encode `signature` (extracted along `path` from `source` to `target`)
/// into the canonical chain.
pub fn encode(graph: &Graph, source: NodeIndex, target: NodeIndex, signature: &Signature) -> Chain {
    let mut chain = Vec::with_capacity(signature.len());
    let mut i = 0;
    while i < signature.len() {
        let (action, gender) = signature[i];
        if action == Action::Parent
            && i + 1 < signature.len()
            && signature[i + 1].0 == Action::Child
        {
            let next_gender = signature[i + 1].1;
            let is_direct = i == 0 && i + 2 == signature.len();
            let atom = if is_direct {
                match (graph.position(source), graph.position(target)) {
                    (Some(from), Some(to)) if from.x != to.x => {
                        sibling_atom(next_gender, to.x < from.x)
                    }
                    _ => unknown_sibling_atom(next_gender),
                }
            } else {
                unknown_sibling_atom(next_gender)
            };
            chain.push(atom);
            i += 2;
            continue;
        }
        chain.push(non_sibling_atom(action, gender));
        i += 1;
    }

    if let Some(&last) = chain.last() {
        if matches!(last, Atom::Son | Atom::Daughter) {
            if let (Some(src), Some(tgt)) = (graph.position(source), graph.position(target)) {
                if (src.y - tgt.y).abs() < SAME_ROW_Y_THRESHOLD && src.x != tgt.x {
                    let elder = tgt.x < src.x;
                    let upgraded = match (last, elder) {
                        (Atom::Son, true) => Atom::SonElder,
                        (Atom::Son, false) => Atom::SonYounger,
                        (Atom::Daughter, true) => Atom::DaughterElder,
                        (Atom::Daughter, false) => Atom::DaughterYounger,
                        _ => unreachable!(),
                    };
                    *chain.last_mut().unwrap() = upgraded;
                }
            }
        }
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeRecord, NodeRecord, Position};
    use crate::signature;

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

    fn encode_for(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>, src: &str, tgt: &str) -> Chain {
        let g = Graph::build(&nodes, &edges);
        let s = g.node_index(src).unwrap();
        let t = g.node_index(tgt).unwrap();
        let path = g.shortest_path(s, t).unwrap();
        let sig = signature::extract(&g, &path).unwrap();
        encode(&g, s, t, &sig)
    }

    #[test]
    fn elder_brother_by_layout() {
        let nodes = vec![
            node("p", Gender::M, Some((0, 0))),
            node("me", Gender::M, Some((100, 200))),
            node("bro", Gender::M, Some((0, 200))),
        ];
        let edges = vec![edge("p", "me", "parent_of"), edge("p", "bro", "parent_of")];
        let chain = encode_for(nodes, edges, "me", "bro");
        assert_eq!(chain, vec![Atom::ElderBrother]);
        assert_eq!(chain_to_string(&chain), "ob");
    }

    #[test]
    fn unknown_order_sister_without_positions() {
        let nodes = vec![
            node("p", Gender::M, None),
            node("me", Gender::M, None),
            node("sis", Gender::F, None),
        ];
        let edges = vec![edge("p", "me", "parent_of"), edge("p", "sis", "parent_of")];
        let chain = encode_for(nodes, edges, "me", "sis");
        assert_eq!(chain, vec![Atom::UnknownSister]);
    }

    #[test]
    fn paternal_grandfather_chain() {
        let nodes = vec![
            node("gf", Gender::M, None),
            node("f", Gender::M, None),
            node("me", Gender::M, None),
        ];
        let edges = vec![edge("gf", "f", "parent_of"), edge("f", "me", "parent_of")];
        let chain = encode_for(nodes, edges, "me", "gf");
        assert_eq!(chain_to_string(&chain), "f,f");
    }

    #[test]
    fn indirect_sibling_hop_always_unknown_order() {
        // me -> father -> grandfather -> great-grandfather -> granduncle:
        // the parent/child pair sits in the middle of the signature, so
        // even with known positions the hop is always xb/xs, never ob/lb.
        let nodes = vec![
            node("ggf", Gender::M, Some((0, 0))),
            node("gf", Gender::M, Some((0, 200))),
            node("granduncle", Gender::M, Some((100, 200))),
            node("father", Gender::M, Some((0, 400))),
            node("me", Gender::M, Some((0, 600))),
        ];
        let edges = vec![
            edge("ggf", "gf", "parent_of"),
            edge("ggf", "granduncle", "parent_of"),
            edge("gf", "father", "parent_of"),
            edge("father", "me", "parent_of"),
        ];
        let chain = encode_for(nodes, edges, "me", "granduncle");
        assert_eq!(chain_to_string(&chain), "f,f,xb");
    }

    #[test]
    fn same_row_child_suffix() {
        let nodes = vec![
            node("me", Gender::M, Some((100, 0))),
            node("kid", Gender::M, Some((0, 50))),
        ];
        let edges = vec![edge("me", "kid", "parent_of")];
        let chain = encode_for(nodes, edges, "me", "kid");
        assert_eq!(chain, vec![Atom::SonElder]);
    }
}
