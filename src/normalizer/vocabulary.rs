//! Canonical vocabularies and legend ordering.
//!
//! Legends list the well-known categories first, in vocabulary order, then any
//! category discovered in data but unknown to the vocabulary, sorted.

use std::collections::BTreeSet;

/// Ordered list of well-known categories for one (dimension, scope)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalVocabulary {
    categories: Vec<String>,
    fallback: String,
}

impl CanonicalVocabulary {
    /// Create a vocabulary; the fallback is appended if not already listed
    pub fn new<I, S>(categories: I, fallback: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fallback = fallback.into();
        let mut seen = BTreeSet::new();
        let mut categories: Vec<String> = categories
            .into_iter()
            .map(Into::into)
            .filter(|c: &String| seen.insert(c.clone()))
            .collect();

        if !categories.contains(&fallback) {
            categories.push(fallback.clone());
        }

        Self {
            categories,
            fallback,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Legend order for the categories actually present in data
    pub fn order<'a, I>(&self, discovered: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let discovered: BTreeSet<String> = discovered.into_iter().map(str::to_string).collect();
        merge_order(&self.categories, &discovered)
    }
}

/// Merge a preferred order with a discovered set
///
/// **Public** - pure function, independent of rendering
///
/// Returns the preferred entries that were discovered, in preferred order,
/// followed by the remaining discovered entries in lexicographic order.
/// Preferred entries absent from `discovered` are left out.
pub fn merge_order(preferred: &[String], discovered: &BTreeSet<String>) -> Vec<String> {
    let mut ordered: Vec<String> = preferred
        .iter()
        .filter(|p| discovered.contains(*p))
        .cloned()
        .collect();

    // BTreeSet iteration is already sorted
    ordered.extend(
        discovered
            .iter()
            .filter(|d| !preferred.contains(d))
            .cloned(),
    );

    ordered
}
