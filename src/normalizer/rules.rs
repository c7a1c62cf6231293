//! Ordered normalization rules.
//!
//! A `RuleSet` is evaluated top to bottom and the first matching pattern wins.
//! Patterns are case-insensitive regular expressions matched anywhere in the
//! trimmed input, so "Status Change", "status-change" and "STATUS_CHANGE" can
//! share one rule. Some patterns are substrings of others; the more specific
//! one must be listed first.

use super::vocabulary::CanonicalVocabulary;
use crate::utils::error::ConfigError;
use regex::{Regex, RegexBuilder};

/// One (pattern, category) pair
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Regex,
    category: String,
}

impl Rule {
    /// Compile a case-insensitive rule
    ///
    /// # Errors
    /// * `ConfigError::InvalidPattern` - Pattern is not a valid regex
    pub fn new(pattern: &str, category: impl Into<String>) -> Result<Self, ConfigError> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            pattern: compiled,
            category: category.into(),
        })
    }

    pub fn matches(&self, input: &str) -> bool {
        self.pattern.is_match(input)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Ordered rules plus the vocabulary they map into
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    vocabulary: CanonicalVocabulary,
}

impl RuleSet {
    /// Build a rule set
    ///
    /// # Errors
    /// * `ConfigError::UnknownCategory` - A rule targets a category outside the vocabulary
    pub fn new(
        dimension: &str,
        vocabulary: CanonicalVocabulary,
        rules: Vec<Rule>,
    ) -> Result<Self, ConfigError> {
        if let Some(rule) = rules.iter().find(|r| !vocabulary.contains(r.category())) {
            return Err(ConfigError::UnknownCategory {
                dimension: dimension.to_string(),
                category: rule.category().to_string(),
            });
        }

        Ok(Self { rules, vocabulary })
    }

    /// Build from `(pattern, category)` pairs
    pub fn from_pairs(
        dimension: &str,
        vocabulary: CanonicalVocabulary,
        pairs: &[(&str, &str)],
    ) -> Result<Self, ConfigError> {
        let rules = pairs
            .iter()
            .map(|(pattern, category)| Rule::new(pattern, *category))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(dimension, vocabulary, rules)
    }

    /// Map a raw label onto exactly one vocabulary category
    ///
    /// Never fails: empty, whitespace-only or unmatched input yields the fallback.
    pub fn normalize(&self, raw: &str) -> &str {
        let input = raw.trim();
        if input.is_empty() {
            return self.vocabulary.fallback();
        }

        self.rules
            .iter()
            .find(|rule| rule.matches(input))
            .map(Rule::category)
            .unwrap_or_else(|| self.vocabulary.fallback())
    }

    /// Rank of a category: index of the first rule producing it
    ///
    /// Categories no rule produces (the fallback, out-of-vocabulary values)
    /// rank after every rule.
    pub fn priority(&self, category: &str) -> usize {
        self.rules
            .iter()
            .position(|rule| rule.category() == category)
            .unwrap_or(self.rules.len())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn vocabulary(&self) -> &CanonicalVocabulary {
        &self.vocabulary
    }

    pub fn fallback(&self) -> &str {
        self.vocabulary.fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RuleSet {
        RuleSet::from_pairs(
            "test",
            CanonicalVocabulary::new(["New EIP", "New", "Status Change"], "Misc"),
            &[
                (r"new[\s_-]*eip", "New EIP"),
                (r"\bnew\b", "New"),
                (r"status[\s_-]*change", "Status Change"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_first_match_wins() {
        let rules = sample();
        assert_eq!(rules.normalize("new eip"), "New EIP");
        assert_eq!(rules.normalize("NEW"), "New");
    }

    #[test]
    fn test_spelling_variants() {
        let rules = sample();
        for raw in ["Status Change", "status-change", "STATUS_CHANGE", "  statuschange "] {
            assert_eq!(rules.normalize(raw), "Status Change", "input {:?}", raw);
        }
    }

    #[test]
    fn test_fallback() {
        let rules = sample();
        assert_eq!(rules.normalize(""), "Misc");
        assert_eq!(rules.normalize("   "), "Misc");
        assert_eq!(rules.normalize("xyzzy"), "Misc");
    }

    #[test]
    fn test_priority() {
        let rules = sample();
        assert_eq!(rules.priority("New EIP"), 0);
        assert_eq!(rules.priority("Status Change"), 2);
        assert_eq!(rules.priority("Misc"), 3);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let result = RuleSet::from_pairs(
            "test",
            CanonicalVocabulary::new(["A"], "Misc"),
            &[("b", "B")],
        );
        assert!(matches!(result, Err(ConfigError::UnknownCategory { .. })));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(matches!(
            Rule::new("(unclosed", "A"),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }
}
