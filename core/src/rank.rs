//! Birth-rank decorator (C8): rewrites a base title like `哥哥` into its
//! ranked form (`二哥`) using the target's position among a same-gender
//! sibling cohort, sorted left-to-right by layout x (spec.md §4.8).

use petgraph::graph::NodeIndex;
use phf::phf_map;

use crate::graph::Graph;
use crate::signature::{self, Signature};

/// How a rewrite rule splices the ordinal into the base title.
#[derive(Debug, Clone, Copy)]
enum RewriteKind {
    /// Drop the whole base title, keep only a trailing core character:
    /// `哥哥` + rank 2 -> `二哥`.
    OrdinalBeforeSuffix(&'static str),
    /// Keep a two-character suffix intact: `伯母` + rank 2 -> `二伯母`.
    OrdinalBeforeTwoCharSuffix(&'static str),
    /// Keep a leading prefix, ordinal goes between prefix and suffix:
    /// `堂哥` + rank 2 -> `堂二哥`.
    OrdinalBeforePrefixPlusSuffix(&'static str, &'static str),
}

impl RewriteKind {
    fn apply(self, rank: usize) -> String {
        let ordinal = ordinal_word(rank);
        match self {
            RewriteKind::OrdinalBeforeSuffix(suffix) => format!("{ordinal}{suffix}"),
            RewriteKind::OrdinalBeforeTwoCharSuffix(suffix) => format!("{ordinal}{suffix}"),
            RewriteKind::OrdinalBeforePrefixPlusSuffix(prefix, suffix) => {
                format!("{prefix}{ordinal}{suffix}")
            }
        }
    }
}

/// Closed rewrite table (spec.md §9 Design Notes: "a small tagged enum
/// rather than a bag of closures"). Covers spec.md §4.8's full reference
/// set, including the grandparent titles (`爷爷`/`奶奶`/`外公`/`外婆`):
/// today every chain that resolves to one of those titles is pure-lineal,
/// so `decorate` short-circuits before ever consulting this table for
/// them, but the table itself is meant to be the closed reference set the
/// spec describes, not merely the entries presently reachable.
static RANK_RULES: phf::Map<&'static str, RewriteKind> = phf_map! {
    "哥哥" => RewriteKind::OrdinalBeforeSuffix("哥"),
    "弟弟" => RewriteKind::OrdinalBeforeSuffix("弟"),
    "姐姐" => RewriteKind::OrdinalBeforeSuffix("姐"),
    "妹妹" => RewriteKind::OrdinalBeforeSuffix("妹"),
    "伯父" => RewriteKind::OrdinalBeforeSuffix("伯"),
    "叔叔" => RewriteKind::OrdinalBeforeSuffix("叔"),
    "姑姑" => RewriteKind::OrdinalBeforeSuffix("姑"),
    "舅舅" => RewriteKind::OrdinalBeforeSuffix("舅"),
    "姨妈" => RewriteKind::OrdinalBeforeSuffix("姨"),
    "婶婶" => RewriteKind::OrdinalBeforeSuffix("婶"),
    "伯母" => RewriteKind::OrdinalBeforeTwoCharSuffix("伯母"),
    "舅妈" => RewriteKind::OrdinalBeforeTwoCharSuffix("舅妈"),
    "姨夫" => RewriteKind::OrdinalBeforeTwoCharSuffix("姨夫"),
    "堂哥" => RewriteKind::OrdinalBeforePrefixPlusSuffix("堂", "哥"),
    "堂弟" => RewriteKind::OrdinalBeforePrefixPlusSuffix("堂", "弟"),
    "堂姐" => RewriteKind::OrdinalBeforePrefixPlusSuffix("堂", "姐"),
    "堂妹" => RewriteKind::OrdinalBeforePrefixPlusSuffix("堂", "妹"),
    "表哥" => RewriteKind::OrdinalBeforePrefixPlusSuffix("表", "哥"),
    "表弟" => RewriteKind::OrdinalBeforePrefixPlusSuffix("表", "弟"),
    "表姐" => RewriteKind::OrdinalBeforePrefixPlusSuffix("表", "姐"),
    "表妹" => RewriteKind::OrdinalBeforePrefixPlusSuffix("表", "妹"),
    "爷爷" => RewriteKind::OrdinalBeforeTwoCharSuffix("爷爷"),
    "奶奶" => RewriteKind::OrdinalBeforeTwoCharSuffix("奶奶"),
    "外公" => RewriteKind::OrdinalBeforeTwoCharSuffix("外公"),
    "外婆" => RewriteKind::OrdinalBeforeTwoCharSuffix("外婆"),
};

const CN_DIGITS: [&str; 9] = ["二", "三", "四", "五", "六", "七", "八", "九", "十"];

/// `1` is always `大` (eldest), `2..=10` use the Chinese numeral, `11+`
/// falls back to a numeric ordinal (spec.md §4.8: "no named word exists
/// past ten").
fn ordinal_word(rank: usize) -> String {
    match rank {
        1 => "大".to_string(),
        2..=10 => CN_DIGITS[rank - 2].to_string(),
        n => format!("第{n}"),
    }
}

fn cohort_of(graph: &Graph, person: NodeIndex) -> Option<Vec<NodeIndex>> {
    let parents = graph.parents_of(person);
    if parents.is_empty() {
        return None;
    }
    let gender = graph.gender(person);
    let mut seen = std::collections::HashSet::new();
    let mut cohort: Vec<NodeIndex> = parents
        .iter()
        .flat_map(|&p| graph.children_of(p))
        .filter(|&c| graph.gender(c) == gender && seen.insert(c))
        .collect();
    cohort.sort_by_key(|&n| graph.position(n).map(|p| p.x).unwrap_or(0));
    Some(cohort)
}

/// The target's 1-based rank and cohort size among same-gender siblings,
/// falling back to a spouse's sibling cohort if the target itself has no
/// parents recorded (spec.md §4.8 step 4: "check spouses in either edge
/// direction").
/// Rank and cohort size, but only when the cohort has at least two
/// members — a lone child has no birth rank to speak of (spec.md §8
/// invariant 6: "rank decoration never produces `total < 2` titles").
fn birth_rank(graph: &Graph, target: NodeIndex) -> Option<(usize, usize)> {
    if let Some(cohort) = cohort_of(graph, target) {
        if cohort.len() >= 2 {
            let rank = cohort.iter().position(|&n| n == target)? + 1;
            return Some((rank, cohort.len()));
        }
    }
    for spouse in graph.spouses_of(target) {
        if let Some(cohort) = cohort_of(graph, spouse) {
            if cohort.len() >= 2 {
                let rank = cohort.iter().position(|&n| n == spouse)? + 1;
                return Some((rank, cohort.len()));
            }
        }
    }
    None
}

/// Decorate `title` with a birth-rank ordinal if the signature is not
/// pure-lineal, the title has a rewrite rule, and a rank can be computed.
/// Otherwise returns `title` unchanged.
pub fn decorate(graph: &Graph, target: NodeIndex, signature: &Signature, title: &str) -> String {
    if signature::is_pure_lineal(signature) {
        return title.to_string();
    }
    let Some(&rule) = RANK_RULES.get(title) else {
        return title.to_string();
    };
    let Some((rank, _total)) = birth_rank(graph, target) else {
        return title.to_string();
    };
    rule.apply(rank)
}
