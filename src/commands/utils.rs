use crate::normalizer::{load_catalog, Dimension, RuleCatalog};
use crate::parser::Scope;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use colored::*;
use std::borrow::Cow;
use std::path::Path;

/// Print the active rule table of one (dimension, scope)
pub fn display_rules(dimension: &str, scope: &str, rules: Option<&Path>) -> Result<()> {
    let dimension: Dimension = dimension.parse()?;
    let scope: Scope = scope.parse()?;
    let catalog = match rules {
        Some(path) => Cow::Owned(
            load_catalog(path).with_context(|| format!("Failed to load rules from {}", path.display()))?,
        ),
        None => Cow::Borrowed(RuleCatalog::builtin()),
    };

    let rule_set = catalog.rule_set(dimension, scope);
    println!("{} rules for scope {}", dimension.to_string().bold(), scope.to_string().bold());
    println!();
    println!("Rules (first match wins):");
    for (i, rule) in rule_set.rules().iter().enumerate() {
        println!("  {:>2}. /{}/i -> {}", i + 1, rule.pattern(), rule.category().cyan());
    }
    println!("   *  (no match) -> {}", rule_set.fallback().cyan());

    println!();
    println!("Legend order: {}", rule_set.vocabulary().categories().join(", "));

    let coarsening = catalog.dimension(dimension).coarsening();
    if scope == Scope::All && !coarsening.is_empty() {
        println!();
        println!("Coarsening into the unified scope:");
        for (from, to) in coarsening {
            println!("  {} -> {}", from, to);
        }
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("PR Label Analytics v{}", env!("CARGO_PKG_VERSION"));
    println!("Chart Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Month-bucketed, deduplicated label counts for proposal pull requests.");
}
