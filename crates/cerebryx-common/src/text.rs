//! Text normalisation and slugging helpers.
//!
//! Every identifier and lookup key in the KG build flows through these
//! functions, so they must stay deterministic: same input, same output,
//! no locale or environment dependence.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

/// Normalise a free-text term for use as a lookup key:
/// strip, collapse internal whitespace, lowercase.
pub fn normalise(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Make a filesystem/ID-friendly slug: runs of non-word characters
/// collapse to a single underscore, leading/trailing underscores trimmed.
pub fn slugify(s: &str) -> String {
    let re = non_word_regex();
    re.replace_all(s.trim(), "_").trim_matches('_').to_string()
}

/// Build a synthetic node ID: `PREFIX_` + uppercased slug.
/// Differently-capitalised spellings of the same label collapse to one ID.
pub fn synthetic_id(prefix: &str, label: &str) -> String {
    format!("{}_{}", prefix, slugify(label).to_uppercase())
}

/// Split a pipe-delimited synonyms field into trimmed, non-empty parts.
pub fn split_synonyms(val: &str) -> Vec<String> {
    val.split('|')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a free-text enumeration on pipes or commas, trimming each token.
pub fn split_multi(val: &str) -> Vec<String> {
    let re = multi_delim_regex();
    re.split(val)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokenise a normalised label into a word set, treating hyphens as spaces.
pub fn token_set(s: &str) -> BTreeSet<String> {
    s.replace('-', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Append `tag` to a pipe-joined provenance string if not already present.
pub fn merge_provenance(existing: &str, tag: &str) -> String {
    if tag.is_empty() {
        return existing.to_string();
    }
    if existing.is_empty() {
        return tag.to_string();
    }
    if existing.split('|').any(|s| s == tag) {
        return existing.to_string();
    }
    format!("{}|{}", existing, tag)
}

fn non_word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w]+").unwrap())
}

fn multi_delim_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[|,]").unwrap())
}
