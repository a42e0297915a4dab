//! Fallback formatter (C9): renders a chain as a plain descriptive phrase
//! when no rule matches any variant (spec.md §4.9).

use std::str::FromStr;

use crate::chain::{Atom, Chain};

/// The Chinese noun for a single chain step (spec.md §4.9's fixed glossary).
fn noun(atom: Atom) -> &'static str {
    match atom {
        Atom::Father => "父",
        Atom::Mother => "母",
        Atom::Son => "子",
        Atom::Daughter => "女",
        Atom::Husband => "夫",
        Atom::Wife => "妻",
        Atom::ElderBrother => "兄",
        Atom::YoungerBrother => "弟",
        Atom::ElderSister => "姐",
        Atom::YoungerSister => "妹",
        Atom::UnknownBrother => "兄弟",
        Atom::UnknownSister => "姐妹",
        Atom::SonElder => "子(长)",
        Atom::SonYounger => "子(幼)",
        Atom::DaughterElder => "女(长)",
        Atom::DaughterYounger => "女(幼)",
    }
}

/// Look up a step's noun from its raw chain code, tolerating a bare atom
/// that carries an `&o`/`&l` suffix it otherwise wouldn't resolve under
/// (a defensive lookup for codes obtained outside the closed `Atom` enum,
/// e.g. from a dialect table), and finally falling back to the raw code
/// itself when nothing resolves — mirroring the reference's
/// `step_names.get(p, step_names.get(p.split("&")[0], p))` three-step
/// lookup chain exactly.
fn noun_by_code(code: &str) -> &str {
    if let Ok(atom) = Atom::from_str(code) {
        return noun(atom);
    }
    let stripped = code.split('&').next().unwrap_or(code);
    match Atom::from_str(stripped) {
        Ok(atom) => noun(atom),
        Err(_) => code,
    }
}

/// Join each step's noun with `" → "` — always computed, independent of
/// whether a rule ultimately matches (spec.md's supplemented path
/// description feature). Looks steps up by their raw chain code (not the
/// typed `Atom`) so that an atom obtained from outside the closed enum
/// (e.g. the chain's comma-joined string form) still resolves.
pub fn path_desc(chain: &Chain) -> String {
    chain
        .iter()
        .map(|&atom| noun_by_code(atom.code()))
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Render `path_desc` as a possessive chain: `"父 → 父"` becomes `"父的父"`.
pub fn fallback_title(path_desc: &str) -> String {
    path_desc.replace(" → ", "的")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grandfather_path_desc_and_fallback() {
        let chain = vec![Atom::Father, Atom::Father];
        let desc = path_desc(&chain);
        assert_eq!(desc, "父 → 父");
        assert_eq!(fallback_title(&desc), "父的父");
    }

    #[test]
    fn single_step_has_no_separator_to_replace() {
        let chain = vec![Atom::ElderBrother];
        let desc = path_desc(&chain);
        assert_eq!(desc, "兄");
        assert_eq!(fallback_title(&desc), "兄");
    }

    #[test]
    fn noun_by_code_resolves_plain_atom() {
        assert_eq!(noun_by_code("f"), "父");
    }

    #[test]
    fn noun_by_code_strips_suffix_defensively() {
        assert_eq!(noun_by_code("xb&o"), "兄弟");
    }

    #[test]
    fn noun_by_code_falls_back_to_the_raw_code_when_unknown() {
        assert_eq!(noun_by_code("zz"), "zz");
    }

    #[test]
    fn every_atom_round_trips_through_its_own_chain() {
        use strum::IntoEnumIterator;
        for atom in Atom::iter() {
            let chain = vec![atom];
            assert_eq!(path_desc(&chain), noun(atom));
        }
    }
}
