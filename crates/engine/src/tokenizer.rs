//! Formula tokenizer — lexical extraction of identifier references.
//!
//! This is deliberately not a parser. After dropping quoted literals, every
//! run of word characters is a candidate, classified by what follows it
//! anywhere in the formula:
//!
//! 1. `name(`        — a call target, dropped entirely;
//! 2. `name.member(` — an object dependency;
//! 3. anything else  — a plain dependency.
//!
//! The checks run in that order and the first match wins, so a name that is
//! called anywhere in the formula is never a dependency, even if it also
//! appears bare.
//!
//! A literal opens and closes with the same quote character, so an apostrophe
//! inside a double-quoted string (`"it's"`) stays part of that string, and
//! `'a" + b + "c'` is a single literal. Any quote does not close any other:
//! a mixed pair such as `'..."` is not a literal.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Single- or double-quoted literal on one line.
static QUOTED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"\n]*"|'[^'\n]*'"#).unwrap());

/// Maximal run of word characters.
static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Text right after a call target.
static CALL_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\(").unwrap());

/// Text right after the receiver of a method call.
static METHOD_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.\w+\(").unwrap());

/// Candidate names extracted from one formula, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaRefs {
    pub plain: Vec<String>,
    pub object: Vec<String>,
}

impl FormulaRefs {
    pub fn is_empty(&self) -> bool {
        self.plain.is_empty() && self.object.is_empty()
    }
}

/// How a single occurrence of a word is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Usage {
    Plain,
    Object,
    Call,
}

/// Remove quoted literals so their contents never count as identifiers.
fn strip_literals(formula: &str) -> String {
    QUOTED_PATTERN.replace_all(formula, "").into_owned()
}

/// Extract plain and object dependency candidates from `formula`.
pub fn scan_formula(formula: &str) -> FormulaRefs {
    let text = strip_literals(formula);

    // Strongest usage seen per distinct word, keeping first-appearance order.
    let mut order: Vec<(&str, Usage)> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for word in WORD_PATTERN.find_iter(&text) {
        let rest = &text[word.end()..];
        let this = if CALL_SUFFIX.is_match(rest) {
            Usage::Call
        } else if METHOD_SUFFIX.is_match(rest) {
            Usage::Object
        } else {
            Usage::Plain
        };

        let token = word.as_str();
        match position.get(token) {
            Some(&pos) => order[pos].1 = order[pos].1.max(this),
            None => {
                position.insert(token, order.len());
                order.push((token, this));
            }
        }
    }

    let mut refs = FormulaRefs::default();
    for (token, usage) in order {
        match usage {
            Usage::Call => {}
            Usage::Object => refs.object.push(token.to_owned()),
            Usage::Plain => refs.plain.push(token.to_owned()),
        }
    }
    refs
}
