use crate::entry::DirectoryEntry;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("拡張子リストが空です")]
    EmptyExtensions,
    #[error("正規表現が不正です: {0}")]
    InvalidPattern(String),
    #[error("連番が上限を超えます: start={start}, count={count}")]
    CounterOverflow { start: usize, count: usize },
}

#[derive(Debug, Clone)]
pub enum MatchRule {
    Extensions(HashSet<String>),
    Stem(Regex),
}

#[derive(Debug, Clone)]
pub enum NamingRule {
    Counter {
        prefix: String,
        start: usize,
    },
    Substitution {
        pattern: Regex,
        replacement: Option<String>,
    },
}

impl MatchRule {
    pub fn extensions(raw: &[String]) -> Result<Self, RuleError> {
        let set: HashSet<String> = raw
            .iter()
            .map(|ext| normalize_extension_key(ext))
            .filter(|ext| !ext.is_empty())
            .collect();

        if set.is_empty() {
            return Err(RuleError::EmptyExtensions);
        }

        Ok(Self::Extensions(set))
    }

    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        match self {
            Self::Extensions(set) => set.contains(&entry.extension_key()),
            Self::Stem(pattern) => pattern.is_match(&entry.stem),
        }
    }
}

impl NamingRule {
    pub fn counter_start(&self) -> usize {
        match self {
            Self::Counter { start, .. } => *start,
            Self::Substitution { .. } => 1,
        }
    }
}

pub fn compile_pattern(pattern: &str) -> Result<Regex, RuleError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| RuleError::InvalidPattern(err.to_string()))
}

fn normalize_extension_key(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{compile_pattern, MatchRule, RuleError};
    use crate::entry::DirectoryEntry;
    use std::path::Path;

    fn entry(name: &str) -> DirectoryEntry {
        DirectoryEntry::from_path(Path::new(name)).expect("entry")
    }

    #[test]
    fn extensions_are_normalized_at_construction() {
        let rule = MatchRule::extensions(&[" .JPG ".to_string(), "py".to_string()])
            .expect("rule must build");
        assert!(rule.matches(&entry("photo.jpg")));
        assert!(rule.matches(&entry("PHOTO.JPG")));
        assert!(rule.matches(&entry("script.PY")));
        assert!(!rule.matches(&entry("notes.txt")));
    }

    #[test]
    fn empty_extension_list_is_rejected() {
        let err = MatchRule::extensions(&[]).expect_err("must fail");
        assert_eq!(err, RuleError::EmptyExtensions);

        let err = MatchRule::extensions(&[" ".to_string(), ".".to_string()])
            .expect_err("must fail");
        assert_eq!(err, RuleError::EmptyExtensions);
    }

    #[test]
    fn stem_rule_searches_case_insensitively() {
        let rule = MatchRule::Stem(compile_pattern("eth").expect("pattern"));
        assert!(rule.matches(&entry("ETH_1.jpg")));
        assert!(rule.matches(&entry("Eth_2.jpg")));
        assert!(rule.matches(&entry("eth_3.jpg")));
        assert!(rule.matches(&entry("my_eth_wallet.txt")));
        assert!(!rule.matches(&entry("btc_1.jpg")));
    }

    #[test]
    fn stem_rule_ignores_the_extension_text() {
        let rule = MatchRule::Stem(compile_pattern("txt").expect("pattern"));
        assert!(!rule.matches(&entry("notes.txt")));
        assert!(rule.matches(&entry("txt_backup.csv")));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = compile_pattern("(eth").expect_err("must fail");
        assert!(matches!(err, RuleError::InvalidPattern(_)));
    }
}
