//! Emphasis-marker stripping for model-generated prose.
//!
//! Handles emphasis delimiters only (`*`, `**`, `***` runs and `__` runs).
//! A run with a letter or digit on both sides is not emphasis (`2*3`,
//! `a__b`) and is kept. Headings, links and lists pass through untouched;
//! richer markup should go through a real lightweight-markup parser rather
//! than a wider pattern here.

use once_cell::sync::Lazy;
use regex::Regex;

static EMPHASIS_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*+|_{2,}").expect("emphasis pattern is valid"));

/// Removes markup decoration from text before display or export.
pub struct TextSanitizer;

impl TextSanitizer {
    /// Strips emphasis-marker runs and surrounding whitespace.
    ///
    /// Idempotent: `clean(clean(x)) == clean(x)`. Only marker characters and
    /// outer whitespace are removed; every other character keeps its order.
    pub fn clean(text: &str) -> String {
        let mut current = text.to_string();
        // Removing one run can fuse two underscores into a new run ("_*_"),
        // so strip until nothing changes.
        loop {
            let next = strip_runs(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current.trim().to_string()
    }
}

fn strip_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for run in EMPHASIS_RUN.find_iter(text) {
        out.push_str(&text[last..run.start()]);
        let before = text[..run.start()].chars().next_back();
        let after = text[run.end()..].chars().next();
        if is_word_char(before) && is_word_char(after) {
            out.push_str(run.as_str());
        }
        last = run.end();
    }
    out.push_str(&text[last..]);
    out
}

fn is_word_char(c: Option<char>) -> bool {
    matches!(c, Some(c) if c.is_alphanumeric())
}
