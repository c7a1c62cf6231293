//! Rule overrides loaded from TOML.
//!
//! An override file replaces whole rule sets and extends coarsening maps:
//!
//! ```toml
//! [[ruleset]]
//! dimension = "label"
//! scope = "eips"
//! vocabulary = ["Typo Fix", "Editorial", "Misc"]
//! fallback = "Misc"
//! rules = [
//!   { pattern = "typo", category = "Typo Fix" },
//!   { pattern = "editorial|wording", category = "Editorial" },
//! ]
//!
//! [[coarsen]]
//! dimension = "label"
//! map = { "Editorial" = "Typo Fix" }
//! ```
//!
//! The resulting catalog is validated before it is returned.

use super::catalog::{Dimension, RuleCatalog};
use super::rules::{Rule, RuleSet};
use super::vocabulary::CanonicalVocabulary;
use crate::parser::schema::Scope;
use crate::utils::error::ConfigError;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Complete override file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub ruleset: Vec<RuleSetConfig>,

    #[serde(default)]
    pub coarsen: Vec<CoarsenConfig>,
}

/// Replacement for one (dimension, scope) rule set
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleSetConfig {
    pub dimension: String,
    pub scope: String,
    pub vocabulary: Vec<String>,
    pub fallback: String,
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One ordered rule
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    pub pattern: String,
    pub category: String,
}

/// Extra coarsening entries for one dimension
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoarsenConfig {
    pub dimension: String,
    pub map: BTreeMap<String, String>,
}

/// Load rule overrides from a TOML file
///
/// # Errors
/// * `ConfigError::IoError` - If file cannot be read
/// * `ConfigError::TomlError` - If TOML is invalid
pub fn load_rules_config(path: impl AsRef<Path>) -> Result<RulesConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: RulesConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Apply overrides on top of the built-in catalog
///
/// # Errors
/// * `ConfigError::Parse` - Unknown dimension or scope name
/// * `ConfigError::InvalidPattern` / `UnknownCategory` - Bad rule entry
/// * `ConfigError::BrokenCoarsening` - Unified scope no longer covers a specific scope
pub fn apply_rules_config(config: &RulesConfig) -> Result<RuleCatalog, ConfigError> {
    let mut catalog = RuleCatalog::builtin().clone();

    for set in &config.ruleset {
        let dimension: Dimension = set.dimension.parse()?;
        let scope: Scope = set.scope.parse()?;

        let rules = set
            .rules
            .iter()
            .map(|r| Rule::new(&r.pattern, r.category.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        let vocabulary = CanonicalVocabulary::new(set.vocabulary.iter().cloned(), set.fallback.clone());

        info!(
            "Overriding {} rules for scope {} ({} rules)",
            dimension,
            scope,
            rules.len()
        );
        catalog.set_rule_set(dimension, scope, RuleSet::new(dimension.as_str(), vocabulary, rules)?);
    }

    for entry in &config.coarsen {
        let dimension: Dimension = entry.dimension.parse()?;
        catalog.extend_coarsening(dimension, entry.map.clone());
    }

    catalog.validate()?;
    Ok(catalog)
}

/// Load and apply an override file in one step
pub fn load_catalog(path: impl AsRef<Path>) -> Result<RuleCatalog, ConfigError> {
    apply_rules_config(&load_rules_config(path)?)
}
