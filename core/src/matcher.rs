//! Three-tier matcher (C7): tries each chain variant in turn, primary
//! exact lookup first, then the combined-regex tier, then the
//! template-expanded branch tier (spec.md §4.7).
//!
//! The loop is variant-outer: for a given variant every tier is tried
//! before moving to the next variant. This follows spec.md's literal
//! prose; see DESIGN.md for the divergence from the original reference
//! implementation's tier-outer loop.

use crate::rules::{RuleRecord, RuleStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Primary,
    Combined,
    Branch,
}

pub struct Match<'a> {
    pub tier: Tier,
    pub variant: String,
    pub rule: &'a RuleRecord,
}

/// Try `variants` (canonical chain first) against `rules`, variant-outer,
/// tier-inner. Returns the first hit; `None` means every variant exhausted
/// every tier and the caller should fall back (spec.md §4.7 step 4).
pub fn match_variants<'a>(rules: &'a RuleStore, variants: &[String]) -> Option<Match<'a>> {
    for variant in variants {
        if let Some(rule) = rules.lookup_primary(variant) {
            return Some(Match {
                tier: Tier::Primary,
                variant: variant.clone(),
                rule,
            });
        }
        if let Some(rule) = rules.lookup_combined(variant) {
            return Some(Match {
                tier: Tier::Combined,
                variant: variant.clone(),
                rule,
            });
        }
        if let Some(rule) = rules.lookup_branch(variant) {
            return Some(Match {
                tier: Tier::Branch,
                variant: variant.clone(),
                rule,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    struct TempCsv {
        path: std::path::PathBuf,
    }
    impl TempCsv {
        fn path(&self) -> &Path {
            &self.path
        }
    }
    impl Drop for TempCsv {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    fn store_from(csv_body: &str) -> RuleStore {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "kinship-core-matcher-test-{:?}.csv",
            std::thread::current().id()
        ));
        std::fs::write(&path, csv_body).unwrap();
        let guard = TempCsv { path };
        let store = RuleStore::load_csv(guard.path()).unwrap();
        store
    }

    #[test]
    fn primary_tier_wins_on_first_variant() {
        let store = store_from("category,chain_pattern,title,aliases\n主要关系,ob,哥哥,\n");
        let variants = vec!["ob".to_string(), "xb".to_string()];
        let m = match_variants(&store, &variants).unwrap();
        assert_eq!(m.tier, Tier::Primary);
        assert_eq!(m.variant, "ob");
        assert_eq!(m.rule.title, "哥哥");
    }

    #[test]
    fn falls_through_to_later_variant_when_earlier_exhausts_all_tiers() {
        let store = store_from("category,chain_pattern,title,aliases\n主要关系,xb,兄弟,\n");
        let variants = vec!["ob".to_string(), "xb".to_string()];
        let m = match_variants(&store, &variants).unwrap();
        assert_eq!(m.variant, "xb");
    }

    #[test]
    fn combined_tier_used_when_primary_misses_for_that_variant() {
        let store = store_from(
            "category,chain_pattern,title,aliases\n并称关系,\"[ob|lb]\",兄弟,\n",
        );
        let variants = vec!["ob".to_string()];
        let m = match_variants(&store, &variants).unwrap();
        assert_eq!(m.tier, Tier::Combined);
    }

    #[test]
    fn branch_tier_used_last() {
        let store = store_from(
            "category,chain_pattern,title,aliases\n分支关系,\"{G1},xb\",伯叔,\n",
        );
        let variants = vec!["f,xb".to_string()];
        let m = match_variants(&store, &variants).unwrap();
        assert_eq!(m.tier, Tier::Branch);
    }

    #[test]
    fn no_match_returns_none() {
        let store = store_from("category,chain_pattern,title,aliases\n主要关系,f,父亲,\n");
        let variants = vec!["xb".to_string()];
        assert!(match_variants(&store, &variants).is_none());
    }

    #[test]
    fn within_a_variant_primary_is_tried_before_combined() {
        let store = store_from(
            "category,chain_pattern,title,aliases\n并称关系,\"[ob|lb]\",兄弟合称,\n主要关系,ob,哥哥,\n",
        );
        let variants = vec!["ob".to_string()];
        let m = match_variants(&store, &variants).unwrap();
        assert_eq!(m.tier, Tier::Primary);
        assert_eq!(m.rule.title, "哥哥");
    }
}
