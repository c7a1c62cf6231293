//! Label normalization.
//!
//! Maps free-text labels onto small, stable category vocabularies:
//! - ordered first-match-wins rule sets (`rules`)
//! - vocabularies and legend ordering (`vocabulary`)
//! - per-dimension, per-scope catalog with unified-scope coarsening (`catalog`)
//! - TOML rule overrides (`config`)

pub mod catalog;
pub mod config;
pub mod rules;
pub mod vocabulary;

// Re-export main types and functions
pub use catalog::{Dimension, DimensionRules, RuleCatalog};
pub use config::{apply_rules_config, load_catalog, load_rules_config, RulesConfig};
pub use rules::{Rule, RuleSet};
pub use vocabulary::{merge_order, CanonicalVocabulary};
