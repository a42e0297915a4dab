//! Kinship title inference: given a family graph and a source/target pair,
//! compute the most specific Chinese kinship title by which the source
//! would address the target.
//!
//! The pipeline has two stages. The codec (`graph`, `signature`, `chain`,
//! `variants`) turns a graph path into a ranked list of candidate chain
//! strings. The matcher (`rules`, `matcher`, `rank`, `fallback`) looks
//! those strings up against a loaded rule table and renders the result.

pub mod chain;
pub mod fallback;
pub mod graph;
pub mod matcher;
pub mod rank;
pub mod rules;
pub mod signature;
pub mod variants;

use serde::Serialize;

pub use graph::{EdgeRecord, Gender, Graph, NodeRecord, Position};
pub use rules::{RuleRecord, RuleStore};

/// The closed set of result tags (spec.md §7: "the matcher never throws").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Primary,
    Combined,
    Branch,
    Fallback,
    None,
    Error,
}

/// The full result of an inference call. Field names and emptiness follow
/// spec.md §6's literal contract (`{title, aliases[], chain, match_type,
/// path_desc}`): `chain`/`path_desc` are plain strings that are empty,
/// never `null`, when no path/chain exists, matching the original's
/// `chain: str = ""` / `path_desc: str = ""` pydantic defaults.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceResult {
    pub title: String,
    pub aliases: Vec<String>,
    pub chain: String,
    pub match_type: Outcome,
    pub path_desc: String,
}

impl InferenceResult {
    /// The `none` outcome: title is always the fixed "没有亲戚关系" per
    /// spec.md §6; `path_desc` carries whatever description applies to
    /// this particular kind of non-relation (disconnected pair, or
    /// identical source/target).
    fn none(path_desc: &str) -> Self {
        Self {
            match_type: Outcome::None,
            title: "没有亲戚关系".to_string(),
            aliases: Vec::new(),
            chain: String::new(),
            path_desc: path_desc.to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            match_type: Outcome::Error,
            title: message.to_string(),
            aliases: Vec::new(),
            chain: String::new(),
            path_desc: String::new(),
        }
    }
}

/// Compute the kinship title `source_id` would use to address `target_id`
/// in the graph described by `nodes`/`edges`, consulting `rules` for the
/// match tiers. Never panics or returns `Err`; unresolvable input degrades
/// to the `none`/`error` outcomes (spec.md §7).
pub fn infer(
    nodes: &[NodeRecord],
    edges: &[EdgeRecord],
    source_id: &str,
    target_id: &str,
    rules: &RuleStore,
) -> InferenceResult {
    let graph = Graph::build(nodes, edges);

    let (Some(source), Some(target)) = (graph.node_index(source_id), graph.node_index(target_id))
    else {
        return InferenceResult::error("无法计算称呼");
    };

    if source == target {
        return InferenceResult::none("");
    }

    let Some(path) = graph.shortest_path(source, target) else {
        return InferenceResult::none("两人之间没有路径连接");
    };

    let Some(signature) = signature::extract(&graph, &path) else {
        return InferenceResult::error("无法计算称呼");
    };

    let chain = chain::encode(&graph, source, target, &signature);
    let path_desc = fallback::path_desc(&chain);
    let variants = variants::generate(&chain);

    if let Some(hit) = matcher::match_variants(rules, &variants) {
        let match_type = match hit.tier {
            matcher::Tier::Primary => Outcome::Primary,
            matcher::Tier::Combined => Outcome::Combined,
            matcher::Tier::Branch => Outcome::Branch,
        };
        let title = rank::decorate(&graph, target, &signature, &hit.rule.title);
        return InferenceResult {
            match_type,
            title,
            aliases: hit.rule.aliases.clone(),
            chain: hit.variant,
            path_desc,
        };
    }

    InferenceResult {
        match_type: Outcome::Fallback,
        title: fallback::fallback_title(&path_desc),
        aliases: Vec::new(),
        chain: chain::chain_to_string(&chain),
        path_desc,
    }
}
