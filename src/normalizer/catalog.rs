//! Rule catalog: every (dimension, scope) rule set plus unified-scope coarsening.
//!
//! The unified `all` scope is a coarsening of the specific scopes: any category
//! reachable under `eips`, `ercs` or `rips` maps onto a category of the `all`
//! vocabulary, so cross-scope aggregation never invents categories.

use super::rules::RuleSet;
use super::vocabulary::CanonicalVocabulary;
use crate::parser::schema::Scope;
use crate::utils::error::{ConfigError, ParseError};
use log::debug;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Classification axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// PR label chart (single dimension)
    Label,
    /// Process type, dimension A of the cross-tab
    Process,
    /// Participant state, dimension B of the cross-tab
    Participants,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Label, Dimension::Process, Dimension::Participants];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Label => "label",
            Dimension::Process => "process",
            Dimension::Participants => "participants",
        }
    }
}

impl FromStr for Dimension {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "label" | "labels" => Ok(Dimension::Label),
            "process" | "category" => Ok(Dimension::Process),
            "participants" | "participant" | "subcategory" => Ok(Dimension::Participants),
            other => Err(ParseError::UnknownDimension(other.to_string())),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule sets of one dimension, one per scope
#[derive(Debug, Clone)]
pub struct DimensionRules {
    eips: RuleSet,
    ercs: RuleSet,
    rips: RuleSet,
    all: RuleSet,
    /// Specific-scope category -> unified category; absent means identity
    coarsen: BTreeMap<String, String>,
}

impl DimensionRules {
    pub fn rule_set(&self, scope: Scope) -> &RuleSet {
        match scope {
            Scope::Eips => &self.eips,
            Scope::Ercs => &self.ercs,
            Scope::Rips => &self.rips,
            Scope::All => &self.all,
        }
    }

    fn rule_set_mut(&mut self, scope: Scope) -> &mut RuleSet {
        match scope {
            Scope::Eips => &mut self.eips,
            Scope::Ercs => &mut self.ercs,
            Scope::Rips => &mut self.rips,
            Scope::All => &mut self.all,
        }
    }

    pub fn coarsen<'a>(&'a self, category: &'a str) -> &'a str {
        self.coarsen.get(category).map(String::as_str).unwrap_or(category)
    }

    /// Explicit coarsening entries; unlisted categories map to themselves
    pub fn coarsening(&self) -> &BTreeMap<String, String> {
        &self.coarsen
    }
}

/// All rule sets used by the pipeline
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    label: DimensionRules,
    process: DimensionRules,
    participants: DimensionRules,
}

impl RuleCatalog {
    /// Shared built-in catalog
    pub fn builtin() -> &'static RuleCatalog {
        static BUILTIN: OnceLock<RuleCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| build_builtin().expect("built-in rule tables are valid"))
    }

    pub fn dimension(&self, dimension: Dimension) -> &DimensionRules {
        match dimension {
            Dimension::Label => &self.label,
            Dimension::Process => &self.process,
            Dimension::Participants => &self.participants,
        }
    }

    fn dimension_mut(&mut self, dimension: Dimension) -> &mut DimensionRules {
        match dimension {
            Dimension::Label => &mut self.label,
            Dimension::Process => &mut self.process,
            Dimension::Participants => &mut self.participants,
        }
    }

    pub fn rule_set(&self, dimension: Dimension, scope: Scope) -> &RuleSet {
        self.dimension(dimension).rule_set(scope)
    }

    /// Normalize a raw label under one scope's rules
    ///
    /// **Public** - per-scope normalization entry point
    pub fn normalize(&self, dimension: Dimension, scope: Scope, raw: &str) -> &str {
        self.rule_set(dimension, scope).normalize(raw)
    }

    /// Map a specific-scope category onto the unified vocabulary
    pub fn coarsen<'a>(&'a self, dimension: Dimension, category: &'a str) -> &'a str {
        self.dimension(dimension).coarsen(category)
    }

    /// Resolve the category of one event as seen from `view_scope`
    ///
    /// Under the unified scope an event from a specific repo is normalized with
    /// its own repo's rules and then coarsened; events from unrecognised repos
    /// use the unified rules directly.
    pub fn classify(&self, dimension: Dimension, view_scope: Scope, repo: &str, raw: &str) -> &str {
        match (view_scope, Scope::from_repo(repo)) {
            (Scope::All, Some(specific)) => {
                let category = self.normalize(dimension, specific, raw);
                self.coarsen(dimension, category)
            }
            (scope, _) => self.normalize(dimension, scope, raw),
        }
    }

    /// Check the coarsening invariant for every dimension
    ///
    /// # Errors
    /// * `ConfigError::BrokenCoarsening` - A specific-scope category has no unified counterpart
    pub fn validate(&self) -> Result<(), ConfigError> {
        for dimension in Dimension::ALL {
            let rules = self.dimension(dimension);
            let unified = rules.rule_set(Scope::All).vocabulary();

            for scope in Scope::SPECIFIC {
                for category in rules.rule_set(scope).vocabulary().categories() {
                    if !unified.contains(rules.coarsen(category)) {
                        return Err(ConfigError::BrokenCoarsening {
                            dimension: dimension.to_string(),
                            scope: scope.to_string(),
                            category: category.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Replace one rule set
    pub(crate) fn set_rule_set(&mut self, dimension: Dimension, scope: Scope, rules: RuleSet) {
        *self.dimension_mut(dimension).rule_set_mut(scope) = rules;
    }

    /// Add or replace coarsening entries
    pub(crate) fn extend_coarsening(
        &mut self,
        dimension: Dimension,
        entries: impl IntoIterator<Item = (String, String)>,
    ) {
        self.dimension_mut(dimension).coarsen.extend(entries);
    }
}

const LABEL_EIPS_VOCAB: &[&str] = &[
    "EIP Update",
    "Typo Fix",
    "Status Change",
    "New EIP",
    "Created By Bot",
    "Misc",
];
const LABEL_EIPS_RULES: &[(&str, &str)] = &[
    ("typo", "Typo Fix"),
    (r"status[\s_-]*change", "Status Change"),
    (r"\beip[\s_-]*update\b|^update$", "EIP Update"),
    (r"created[\s_-]*by[\s_-]*bot|\bbot\b", "Created By Bot"),
    (r"new[\s_-]*eip", "New EIP"),
];

const LABEL_ERCS_VOCAB: &[&str] = &[
    "ERC Update",
    "Typo Fix",
    "Status Change",
    "New ERC",
    "Created By Bot",
    "Misc",
];
const LABEL_ERCS_RULES: &[(&str, &str)] = &[
    ("typo", "Typo Fix"),
    (r"status[\s_-]*change", "Status Change"),
    (r"\berc[\s_-]*update\b|^update$", "ERC Update"),
    (r"created[\s_-]*by[\s_-]*bot|\bbot\b", "Created By Bot"),
    (r"new[\s_-]*erc", "New ERC"),
];

const LABEL_RIPS_VOCAB: &[&str] = &["Update", "Typo Fix", "New RIP", "Created By Bot", "Misc"];
const LABEL_RIPS_RULES: &[(&str, &str)] = &[
    ("typo", "Typo Fix"),
    (r"\bupdate\b", "Update"),
    (r"new[\s_-]*rip", "New RIP"),
    (r"created[\s_-]*by[\s_-]*bot|\bbot\b", "Created By Bot"),
];

const LABEL_ALL_VOCAB: &[&str] = &[
    "Update",
    "Typo Fix",
    "Status Change",
    "New Proposal",
    "Created By Bot",
    "Misc",
];
const LABEL_ALL_RULES: &[(&str, &str)] = &[
    ("typo", "Typo Fix"),
    (r"status[\s_-]*change", "Status Change"),
    (r"\bupdate\b", "Update"),
    (r"created[\s_-]*by[\s_-]*bot|\bbot\b", "Created By Bot"),
    (r"new[\s_-]*(eip|erc|rip)", "New Proposal"),
];

const LABEL_COARSENING: &[(&str, &str)] = &[
    ("EIP Update", "Update"),
    ("ERC Update", "Update"),
    ("New EIP", "New Proposal"),
    ("New ERC", "New Proposal"),
    ("New RIP", "New Proposal"),
];

const PROCESS_VOCAB: &[&str] = &[
    "PR DRAFT",
    "Typo",
    "NEW EIP",
    "Website",
    "EIP-1",
    "Tooling",
    "Status Change",
    "Other",
];

/// Process rules differ per scope only in which "new proposal" spelling counts
fn process_rules(new_pattern: &'static str) -> [(&'static str, &'static str); 7] {
    [
        (r"pr[\s_-]*draft", "PR DRAFT"),
        ("typo", "Typo"),
        (r"status[\s_-]*change", "Status Change"),
        (new_pattern, "NEW EIP"),
        ("website", "Website"),
        (r"\beip[\s_-]?0*1\b", "EIP-1"),
        (r"tooling|\br-ci\b|\br-process\b", "Tooling"),
    ]
}

const PARTICIPANTS_VOCAB: &[&str] = &[
    "Waiting on Editor",
    "Waiting on Author",
    "Stagnant",
    "Awaited",
    "Misc",
];
const PARTICIPANTS_RULES: &[(&str, &str)] = &[
    (
        r"waiting[\s_-]*on[\s_-]*editor|editor[\s_-]*review|needs[\s_-]*editor|\be-review\b|\be-consensus\b",
        "Waiting on Editor",
    ),
    (
        r"waiting[\s_-]*on[\s_-]*author|author[\s_-]*review|\ba-review\b",
        "Waiting on Author",
    ),
    ("stagnant", "Stagnant"),
    (r"await|draft|^\(\)$", "Awaited"),
    ("uncategorized|misc", "Misc"),
];

fn build_builtin() -> Result<RuleCatalog, ConfigError> {
    let label_set = |vocab: &[&str], rules: &[(&str, &str)]| {
        RuleSet::from_pairs("label", CanonicalVocabulary::new(vocab.iter().copied(), "Misc"), rules)
    };
    let process_set = |new_pattern: &'static str| {
        RuleSet::from_pairs(
            "process",
            CanonicalVocabulary::new(PROCESS_VOCAB.iter().copied(), "Other"),
            &process_rules(new_pattern),
        )
    };
    let participants_set = || {
        RuleSet::from_pairs(
            "participants",
            CanonicalVocabulary::new(PARTICIPANTS_VOCAB.iter().copied(), "Misc"),
            PARTICIPANTS_RULES,
        )
    };

    let catalog = RuleCatalog {
        label: DimensionRules {
            eips: label_set(LABEL_EIPS_VOCAB, LABEL_EIPS_RULES)?,
            ercs: label_set(LABEL_ERCS_VOCAB, LABEL_ERCS_RULES)?,
            rips: label_set(LABEL_RIPS_VOCAB, LABEL_RIPS_RULES)?,
            all: label_set(LABEL_ALL_VOCAB, LABEL_ALL_RULES)?,
            coarsen: LABEL_COARSENING
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        },
        process: DimensionRules {
            eips: process_set(r"new[\s_-]*eip")?,
            ercs: process_set(r"new[\s_-]*(erc|eip)")?,
            rips: process_set(r"new[\s_-]*(rip|eip)")?,
            all: process_set(r"new[\s_-]*(eip|erc|rip)")?,
            coarsen: BTreeMap::new(),
        },
        participants: DimensionRules {
            eips: participants_set()?,
            ercs: participants_set()?,
            rips: participants_set()?,
            all: participants_set()?,
            coarsen: BTreeMap::new(),
        },
    };

    catalog.validate()?;
    debug!("Built-in rule catalog ready");
    Ok(catalog)
}
