//! Tokenization and term expansion shared by the scorers.
//!
//! `tokenize` lowercases and strips everything outside `[a-z0-9+#.-]`, then drops stop words.
//! `expand_terms` closes a token list under dot-splitting and the alias table, so every alias
//! spelling of the same ecosystem name ("react.js", "reactjs") lands on the same term set.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::OnceLock;

const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "if", "then", "else", "for", "on", "in", "at", "to", "of", "a",
    "an", "with", "by", "from", "as", "is", "are", "was", "were", "be", "been", "this", "that",
    "these", "those", "it", "its", "we", "you", "they", "i", "my", "our", "your", "their",
];

/// (alias, canonical) pairs.
const ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("ts", "typescript"),
    ("react.js", "react"),
    ("reactjs", "react"),
    ("node.js", "node"),
    ("nodejs", "node"),
    ("next.js", "nextjs"),
    ("express.js", "express"),
    ("mongo", "mongodb"),
];

fn stop_words() -> &'static HashSet<&'static str> {
    static STOP: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// canonical -> every spelling in its class (canonical included).
fn alias_classes() -> &'static HashMap<&'static str, Vec<&'static str>> {
    static CLASSES: OnceLock<HashMap<&'static str, Vec<&'static str>>> = OnceLock::new();
    CLASSES.get_or_init(|| {
        let mut classes: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        for &(alias, canonical) in ALIASES {
            let class = classes.entry(canonical).or_insert_with(|| vec![canonical]);
            class.push(alias);
        }
        classes
    })
}

/// Canonical name for an alias spelling; `None` for canonical names and unknown terms.
fn canonical_of(term: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == term)
        .map(|(_, canonical)| *canonical)
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '#' | '.' | '-')
}

/// Lowercases, replaces disallowed characters with spaces, splits on whitespace, and drops
/// stop words. Empty input yields an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_token_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|t| !stop_words().contains(t))
        .map(str::to_string)
        .collect()
}

/// Expands tokens into a term set: originals, dot-separated segments, the dot-stripped form,
/// and, for alias spellings, every member of the alias class. Applied until no new term
/// appears, so the result is idempotent and independent of token order.
///
/// Canonical names expand to nothing: "react" stays "react" and never reaches "javascript"
/// through "react.js".
pub fn expand_terms<S: AsRef<str>>(tokens: &[S]) -> BTreeSet<String> {
    let mut terms = BTreeSet::new();
    let mut pending: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();

    while let Some(term) = pending.pop() {
        if term.is_empty() || !terms.insert(term.clone()) {
            continue;
        }

        if term.contains('.') {
            pending.extend(
                term.split('.')
                    .filter(|part| !part.is_empty())
                    .map(str::to_string),
            );
            pending.push(term.replace('.', ""));
        }

        if let Some(class) = canonical_of(&term).and_then(|c| alias_classes().get(c)) {
            pending.extend(class.iter().map(|s| s.to_string()));
        }
    }

    terms
}
