//! Glob-style name matching for constraint and command arguments that
//! accept wildcards (`set_false_path -from *reg*`, clock name patterns, …).
//!
//! `*` matches zero or more characters, `?` matches exactly one, anchored
//! over the whole string. Implemented by translating the glob to an
//! anchored [`regex::Regex`] rather than hand-rolling the match loop.

use regex::{Regex, RegexBuilder};

/// A compiled glob pattern, matched case-sensitively unless `nocase` was
/// requested at construction.
pub struct PatternMatch {
    pattern: String,
    nocase: bool,
    regex: Regex,
}

/// Translates a glob pattern (`*`, `?`) into an anchored regex body,
/// escaping every other character so it matches literally.
fn glob_to_regex_body(pattern: &str) -> String {
    let mut body = String::with_capacity(pattern.len() * 2);
    body.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => body.push_str(".*"),
            '?' => body.push('.'),
            _ => {
                for escaped in regex::escape(&ch.to_string()).chars() {
                    body.push(escaped);
                }
            }
        }
    }
    body.push('$');
    body
}

impl PatternMatch {
    /// Compiles `pattern` for case-sensitive glob matching.
    pub fn new(pattern: &str) -> Self {
        Self::with_case(pattern, false)
    }

    /// Compiles `pattern` for matching, ignoring case if `nocase`.
    pub fn with_case(pattern: &str, nocase: bool) -> Self {
        let body = glob_to_regex_body(pattern);
        let regex = RegexBuilder::new(&body)
            .case_insensitive(nocase)
            .build()
            .expect("glob-derived regex is always well-formed");
        Self {
            pattern: pattern.to_string(),
            nocase,
            regex,
        }
    }

    /// `true` if `str` matches this pattern in full.
    pub fn matches(&self, str: &str) -> bool {
        self.regex.is_match(str)
    }

    /// The original glob pattern text.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// `true` if this pattern was compiled to ignore case.
    pub fn nocase(&self) -> bool {
        self.nocase
    }

    /// `true` if `pattern` contains a `*` or `?` wildcard.
    pub fn has_wildcards(&self) -> bool {
        pattern_has_wildcards(&self.pattern)
    }
}

/// `true` if `pattern` contains a `*` or `?` wildcard.
pub fn pattern_has_wildcards(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// One-shot glob match without keeping a compiled [`PatternMatch`] around.
pub fn pattern_match(pattern: &str, str: &str) -> bool {
    PatternMatch::new(pattern).matches(str)
}

/// One-shot case-insensitive glob match.
pub fn pattern_match_no_case(pattern: &str, str: &str) -> bool {
    PatternMatch::with_case(pattern, true).matches(str)
}
