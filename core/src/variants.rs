//! Variant generator (C5): alternate chains to try against the rule store,
//! canonical chain always first.

use itertools::Itertools;

use crate::chain::{chain_to_string, Atom, Chain};

// Only ever called with a sibling atom (`chain[idx]` for `idx` drawn from
// `sibling_indices`, which is filtered by `Atom::is_sibling`).
fn replacements(atom: Atom) -> &'static [Atom] {
    use Atom::*;
    match atom {
        ElderBrother => &[ElderBrother, UnknownBrother, SonElder],
        YoungerBrother => &[YoungerBrother, UnknownBrother, SonYounger],
        ElderSister => &[ElderSister, UnknownSister, DaughterElder],
        YoungerSister => &[YoungerSister, UnknownSister, DaughterYounger],
        UnknownBrother => &[UnknownBrother, SonElder, SonYounger, ElderBrother, YoungerBrother],
        UnknownSister => &[UnknownSister, DaughterElder, DaughterYounger, ElderSister, YoungerSister],
        _ => unreachable!("replacements() is only called on sibling atoms"),
    }
}

fn ends_with_elder_younger_suffix(chain: &[Atom]) -> bool {
    matches!(
        chain.last(),
        Some(Atom::SonElder | Atom::SonYounger | Atom::DaughterElder | Atom::DaughterYounger)
    )
}

fn strip_suffix(atom: Atom) -> Atom {
    match atom {
        Atom::SonElder | Atom::SonYounger => Atom::Son,
        Atom::DaughterElder | Atom::DaughterYounger => Atom::Daughter,
        other => other,
    }
}

/// Produce the ordered list of alternative chains for `chain`, canonical
/// chain first. Fires only if the chain contains a sibling atom or ends
/// with a `&o`/`&l` suffix (spec.md §4.5); otherwise returns `[chain]`.
pub fn generate(chain: &Chain) -> Vec<String> {
    let canonical = chain_to_string(chain);
    let sibling_indices: Vec<usize> = chain
        .iter()
        .enumerate()
        .filter(|(_, a)| a.is_sibling())
        .map(|(i, _)| i)
        .collect();
    let has_suffix = ends_with_elder_younger_suffix(chain);

    if sibling_indices.is_empty() && !has_suffix {
        return vec![canonical];
    }

    let base_variants: Vec<Chain> = if sibling_indices.is_empty() {
        vec![chain.clone()]
    } else {
        sibling_indices
            .iter()
            .map(|&idx| replacements(chain[idx]))
            .multi_cartesian_product()
            .map(|choices| {
                let mut variant = chain.clone();
                for (&idx, &replacement) in sibling_indices.iter().zip(choices.iter()) {
                    variant[idx] = replacement;
                }
                variant
            })
            .collect()
    };

    let mut seen = std::collections::HashSet::new();
    let mut all_variants = Vec::new();
    for variant in &base_variants {
        let s = chain_to_string(variant);
        if seen.insert(s.clone()) {
            all_variants.push(s);
        }
        if ends_with_elder_younger_suffix(variant) {
            let mut stripped = variant.clone();
            let last = stripped.len() - 1;
            stripped[last] = strip_suffix(stripped[last]);
            let s = chain_to_string(&stripped);
            if seen.insert(s.clone()) {
                all_variants.push(s);
            }
        }
    }

    all_variants.retain(|v| v != &canonical);
    all_variants.insert(0, canonical);
    all_variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Atom;

    #[test]
    fn no_sibling_atoms_yields_single_canonical_variant() {
        let chain = vec![Atom::Father, Atom::Father];
        assert_eq!(generate(&chain), vec!["f,f".to_string()]);
    }

    #[test]
    fn canonical_chain_is_first() {
        let chain = vec![Atom::ElderBrother];
        let variants = generate(&chain);
        assert_eq!(variants[0], "ob");
        assert!(variants.contains(&"xb".to_string()));
        assert!(variants.contains(&"s&o".to_string()));
    }

    #[test]
    fn unknown_order_expands_to_five_forms_plus_canonical() {
        let chain = vec![Atom::UnknownBrother];
        let variants = generate(&chain);
        assert_eq!(variants[0], "xb");
        for expect in ["xb", "s&o", "s&l", "ob", "lb"] {
            assert!(variants.contains(&expect.to_string()), "missing {expect}");
        }
    }

    #[test]
    fn suffix_variant_gets_a_stripped_twin() {
        let chain = vec![Atom::SonElder];
        let variants = generate(&chain);
        assert!(variants.contains(&"s".to_string()));
    }

    #[test]
    fn duplicates_are_removed_preserving_first_occurrence() {
        let chain = vec![Atom::ElderBrother, Atom::ElderBrother];
        let variants = generate(&chain);
        let unique: std::collections::HashSet<_> = variants.iter().collect();
        assert_eq!(unique.len(), variants.len());
    }
}
