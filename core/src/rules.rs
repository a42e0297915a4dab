//! Rule store (C6): primary / combined / branch rule tables plus the
//! template-variable catalog, loaded once from the CSV fixture and held
//! immutable for the lifetime of the process (spec.md §5).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct RuleRecord {
    pub category: String,
    pub pattern: String,
    pub title: String,
    pub aliases: Vec<String>,
}

/// A branch rule plus its fully-expanded, load-time-materialized list of
/// concrete disjunction patterns (spec.md §9: "the cross-product is small
/// ... and may be ... cached per rule at load time").
#[derive(Debug, Clone)]
pub(crate) struct BranchRule {
    pub(crate) record: RuleRecord,
    pub(crate) expansions: Vec<String>,
}

lazy_static! {
    /// The closed template-variable catalog (spec.md §3). `M2M`/`M2W`
    /// extend the `M1M`/`M1W` pattern one generation further up the
    /// spouse's line (grandparent-in-law) — spec.md names them but does
    /// not spell out their expansions; see DESIGN.md for this decision.
    static ref TEMPLATE_VARS: HashMap<&'static str, Vec<&'static str>> = {
        let mut m = HashMap::new();
        m.insert("G0", vec![""]);
        m.insert("G1", vec!["f", "m"]);
        m.insert("G1M", vec!["f"]);
        m.insert("G1W", vec!["m"]);
        m.insert("G2", vec!["f,f", "f,m", "m,f", "m,m"]);
        m.insert("M0", vec!["h", "w"]);
        m.insert("M1M", vec!["h,f", "w,f"]);
        m.insert("M1W", vec!["h,m", "w,m"]);
        m.insert("M2M", vec!["h,f,f", "w,f,f"]);
        m.insert("M2W", vec!["h,m,m", "w,m,m"]);
        m.insert("M-1", vec!["s", "d"]);
        m
    };
}

/// Find the first `{NAME}` token in `pattern`, if any.
fn first_variable(pattern: &str) -> Option<(usize, usize, &str)> {
    let start = pattern.find('{')?;
    let end = pattern[start..].find('}').map(|i| start + i)?;
    Some((start, end + 1, &pattern[start + 1..end]))
}

/// Substitute one occurrence of a `{VAR}` token with `replacement`,
/// splicing out an adjacent comma when `replacement` is empty (spec.md
/// §4.7: "prefer right-side, fall back to left-side if the variable is
/// the final token").
fn splice(pattern: &str, start: usize, end: usize, replacement: &str) -> String {
    let prefix = &pattern[..start];
    let suffix = &pattern[end..];
    if replacement.is_empty() {
        if let Some(rest) = suffix.strip_prefix(',') {
            format!("{prefix}{rest}")
        } else if let Some(rest) = prefix.strip_suffix(',') {
            format!("{rest}{suffix}")
        } else {
            format!("{prefix}{suffix}")
        }
    } else {
        format!("{prefix}{replacement}{suffix}")
    }
}

/// Recursively expand every `{VAR}` token in `pattern` into the full list
/// of concrete patterns (which may still contain `[a|b]` disjunctions).
/// An unknown variable name yields no expansions (the rule never matches).
fn expand_templates(pattern: &str) -> Vec<String> {
    let Some((start, end, name)) = first_variable(pattern) else {
        return vec![pattern.to_string()];
    };
    let Some(options) = TEMPLATE_VARS.get(name) else {
        return vec![];
    };
    options
        .iter()
        .flat_map(|&replacement| expand_templates(&splice(pattern, start, end, replacement)))
        .collect()
}

/// Compile a `[a|b|...]` disjunction pattern into a whole-string-matching
/// regex, escaping every non-bracket character. Returns `None` for
/// unbalanced brackets or any other malformed pattern (spec.md §4.6:
/// "skipped silently and never match").
fn compile_disjunction(pattern: &str) -> Option<Regex> {
    let mut regex_str = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '[' => {
                let mut depth = 1;
                let mut content = String::new();
                loop {
                    match chars.next() {
                        None => return None,
                        Some('[') => {
                            depth += 1;
                            content.push('[');
                        }
                        Some(']') => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            content.push(']');
                        }
                        Some(other) => content.push(other),
                    }
                }
                let alternatives = content
                    .split('|')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join("|");
                regex_str.push_str("(?:");
                regex_str.push_str(&alternatives);
                regex_str.push(')');
            }
            ']' => return None,
            other => regex_str.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex_str.push('$');
    Regex::new(&regex_str).ok()
}

/// Holds primary / combined / branch rules plus the auxiliary buckets
/// (input, prefix, pair, dialect) that are parsed but not consulted by
/// the core matcher (spec.md §4.6).
pub struct RuleStore {
    primary: HashMap<String, RuleRecord>,
    combined: Vec<RuleRecord>,
    branch: Vec<BranchRule>,
    input: HashMap<String, RuleRecord>,
    prefix: Vec<RuleRecord>,
    pair: Vec<RuleRecord>,
    dialect: HashMap<String, Vec<RuleRecord>>,
    compiled: Mutex<HashMap<String, Option<Regex>>>,
}

impl RuleStore {
    /// Load the rule table from a CSV file: `category, chain_pattern,
    /// title, aliases`, one header row. See spec.md §6.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening rule table {}", path.display()))?;

        let mut store = Self {
            primary: HashMap::new(),
            combined: Vec::new(),
            branch: Vec::new(),
            input: HashMap::new(),
            prefix: Vec::new(),
            pair: Vec::new(),
            dialect: HashMap::new(),
            compiled: Mutex::new(HashMap::new()),
        };

        for row in reader.records() {
            let row = row.context("reading rule table row")?;
            let category = row.get(0).unwrap_or_default().trim().to_string();
            let pattern = row.get(1).unwrap_or_default().trim().trim_matches('"').to_string();
            if pattern.is_empty() {
                continue;
            }
            let title = row.get(2).unwrap_or_default().trim().to_string();
            let aliases_raw = row.get(3).unwrap_or_default().trim();
            let aliases: Vec<String> = if aliases_raw.is_empty() {
                vec![title.clone()]
            } else {
                aliases_raw
                    .split('、')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect()
            };
            let record = RuleRecord {
                category: category.clone(),
                pattern: pattern.clone(),
                title,
                aliases,
            };
            match category.as_str() {
                "主要关系" => {
                    store.primary.insert(pattern, record);
                }
                "并称关系" => store.combined.push(record),
                "分支关系" => {
                    let expansions = expand_templates(&pattern);
                    store.branch.push(BranchRule { record, expansions });
                }
                "输入关系" => {
                    store.input.insert(pattern, record);
                }
                "分支前缀" => store.prefix.push(record),
                "关系合称" => store.pair.push(record),
                other if other.ends_with("方言") => {
                    store.dialect.entry(category).or_default().push(record);
                }
                _ => {}
            }
        }

        let _ = &store.input;
        let _ = &store.prefix;
        let _ = &store.pair;
        let _ = &store.dialect;
        Ok(store)
    }

    pub(crate) fn lookup_primary(&self, chain: &str) -> Option<&RuleRecord> {
        self.primary.get(chain)
    }

    pub(crate) fn lookup_combined(&self, chain: &str) -> Option<&RuleRecord> {
        self.combined
            .iter()
            .find(|rule| self.full_match(&rule.pattern, chain))
    }

    pub(crate) fn lookup_branch(&self, chain: &str) -> Option<&RuleRecord> {
        self.branch.iter().find_map(|rule| {
            rule.expansions
                .iter()
                .any(|pattern| self.full_match(pattern, chain))
                .then_some(&rule.record)
        })
    }

    fn full_match(&self, pattern: &str, chain: &str) -> bool {
        let mut cache = self.compiled.lock().expect("regex cache poisoned");
        let compiled = cache
            .entry(pattern.to_string())
            .or_insert_with(|| compile_disjunction(pattern));
        compiled.as_ref().is_some_and(|re| re.is_match(chain))
    }

    /// Rules in the `输入关系` bucket, by chain key. Not consulted by the
    /// core matcher; kept for a future simplified-form surface.
    pub fn input_rule(&self, chain: &str) -> Option<&RuleRecord> {
        self.input.get(chain)
    }

    /// Rules in the `分支前缀` bucket, in CSV order.
    pub fn prefix_rules(&self) -> &[RuleRecord] {
        &self.prefix
    }

    /// Rules in the `关系合称` bucket, in CSV order.
    pub fn pair_rules(&self) -> &[RuleRecord] {
        &self.pair
    }

    /// Rules for a named dialect (any category ending in `方言`).
    pub fn dialect_rules(&self, dialect: &str) -> Option<&[RuleRecord]> {
        self.dialect.get(dialect).map(Vec::as_slice)
    }
}
