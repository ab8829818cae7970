//! Intent classification for incoming query messages.
//!
//! A message is either a bare milestone code (`MAN-1`), a domain/level
//! request containing `Domain: <word>, Level: <digits>`, or unrecognized.
//! The code pattern is always tried first; when it matches, the
//! domain/level pattern is never consulted.
//!
//! Both patterns are ASCII-only: `[0-9]` and `[A-Za-z0-9_]` are spelled out
//! because the `regex` crate's `\d` and `\w` match Unicode classes.

use once_cell::sync::Lazy;
use regex::Regex;

static CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}-[0-9]+$").expect("code pattern is valid"));

static DOMAIN_LEVEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Domain: ([A-Za-z0-9_]+), Level: ([0-9]+)").expect("domain pattern is valid")
});

/// The classified purpose of a query message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Exact lookup of one milestone by code.
    CodeLookup { code: String },
    /// List every milestone in a domain at a level.
    DomainLevelLookup { domain: String, level: i64 },
    /// Matched neither pattern.
    Unrecognized,
}

/// Returns `true` if `code` has the shape of a milestone code.
pub fn is_milestone_code(code: &str) -> bool {
    CODE_PATTERN.is_match(code)
}

/// Classify a message.
///
/// Callers must reject empty or whitespace-only messages first (see
/// [`crate::validate`]).
pub fn parse(message: &str) -> Intent {
    let trimmed = message.trim();
    if is_milestone_code(trimmed) {
        return Intent::CodeLookup {
            code: trimmed.to_string(),
        };
    }

    if let Some(caps) = DOMAIN_LEVEL_PATTERN.captures(message) {
        // The capture is all digits, so parsing only fails on overflow.
        // Saturate: no stored level is that large, so the lookup finds nothing.
        let level = caps[2].parse::<i64>().unwrap_or(i64::MAX);
        return Intent::DomainLevelLookup {
            domain: caps[1].to_string(),
            level,
        };
    }

    Intent::Unrecognized
}
