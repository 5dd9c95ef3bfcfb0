//! Checker identifiers derived from quota codes

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Separator every run of non-alphanumeric characters collapses to.
pub const CANONICAL_SEPARATOR: char = '_';

/// Registry key for a checker routine.
///
/// Built from a quota code by collapsing each run of non-alphanumeric characters
/// into a single `_` (`L-DFA99DE7` becomes `L_DFA99DE7`). Lookups are exact and
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckerId(String);

impl CheckerId {
    pub fn from_quota_code(quota_code: &str) -> Self {
        let mut id = String::with_capacity(quota_code.len());
        let mut in_separator = false;

        for ch in quota_code.trim().chars() {
            if ch.is_ascii_alphanumeric() {
                id.push(ch);
                in_separator = false;
            } else if !in_separator {
                id.push(CANONICAL_SEPARATOR);
                in_separator = true;
            }
        }

        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CheckerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_hyphen_with_underscore() {
        assert_eq!(CheckerId::from_quota_code("L-DFA99DE7").as_str(), "L_DFA99DE7");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(CheckerId::from_quota_code("L--12 .34").as_str(), "L_12_34");
    }

    #[test]
    fn keeps_case() {
        let upper = CheckerId::from_quota_code("L-ABC");
        let lower = CheckerId::from_quota_code("l-abc");
        assert_ne!(upper, lower);
    }

    #[test]
    fn already_normalized_is_unchanged() {
        assert_eq!(CheckerId::from_quota_code("L_0DA4ABF3").as_str(), "L_0DA4ABF3");
    }
}
