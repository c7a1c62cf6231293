//! Shared setup for the `chart` and `export` commands.
//!
//! Both commands resolve the same arguments into the same catalog, scope,
//! dimensions and filters, and load their batch through a `ViewSession`, so
//! an export always describes exactly what the chart with the same arguments
//! shows.

use super::models::ViewArgs;
use crate::aggregator::Dimensions;
use crate::chart::{CategorySelection, Filters};
use crate::normalizer::{load_catalog, Dimension, RuleCatalog};
use crate::parser::{parse_events, MonthKey, ParseOptions, ParsedBatch, Scope};
use crate::session::{ViewSession, ViewStatus};
use crate::source::{read_events_file, EventClient};
use anyhow::{Context, Result};
use log::{debug, info};
use std::borrow::Cow;
use std::sync::Arc;

/// Fully parsed view arguments
#[derive(Debug, Clone)]
pub struct ResolvedView {
    pub catalog: Cow<'static, RuleCatalog>,
    pub scope: Scope,
    pub dimensions: Dimensions,
    pub filters: Filters,
}

/// Validate view arguments
///
/// **Public** - can be called before any command for early validation
pub fn validate_view_args(args: &ViewArgs) -> Result<()> {
    match (&args.input, &args.url) {
        (None, None) => anyhow::bail!("Either --input or --url is required"),
        (Some(_), Some(_)) => anyhow::bail!("--input and --url are mutually exclusive"),
        (None, Some(url)) => {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("URL must start with http:// or https://");
            }
        }
        (Some(_), None) => {}
    }

    args.scope.parse::<Scope>()?;

    if !args.cross {
        let dimension: Dimension = args.dimension.parse()?;
        if dimension == Dimension::Participants {
            anyhow::bail!("The participants dimension is only available with --cross");
        }
        if !args.participants.is_empty() {
            anyhow::bail!("--participant filters require --cross");
        }
    }

    if let Some(month) = &args.month {
        month.parse::<MonthKey>()?;
    }

    if args.categories.iter().chain(&args.participants).any(|c| c.trim().is_empty()) {
        anyhow::bail!("Category filters cannot be empty");
    }

    Ok(())
}

/// Resolve validated arguments
///
/// **Public** - shared by chart and export
pub fn resolve_view(args: &ViewArgs) -> Result<ResolvedView> {
    let catalog = match &args.rules {
        Some(path) => {
            info!("Loading rule overrides from: {}", path.display());
            Cow::Owned(
                load_catalog(path)
                    .with_context(|| format!("Failed to load rules from {}", path.display()))?,
            )
        }
        None => Cow::Borrowed(RuleCatalog::builtin()),
    };

    let dimensions = if args.cross {
        Dimensions::CROSS
    } else {
        Dimensions::One(args.dimension.parse()?)
    };

    let mut filters = Filters::new()
        .with_primary(CategorySelection::only(args.categories.iter().map(|c| c.trim())))
        .with_secondary(CategorySelection::only(args.participants.iter().map(|c| c.trim())));
    if let Some(month) = &args.month {
        filters = filters.with_month(month.parse()?);
    }

    Ok(ResolvedView {
        catalog,
        scope: args.scope.parse()?,
        dimensions,
        filters,
    })
}

/// Load and parse the batch through a session
///
/// **Public** - the pipeline only ever sees a batch whose load succeeded
///
/// # Errors
/// * Read/fetch failures and unparseable batches; the session is left `Failed`
pub fn load_batch(args: &ViewArgs, session: &ViewSession<ParsedBatch>) -> Result<Arc<ParsedBatch>> {
    let ticket = session.begin();
    let options = ParseOptions {
        tag_bot_authors: args.tag_bots,
    };

    let loaded = read_raw(args).and_then(|raw| {
        parse_events(&raw, options).context("Failed to parse event batch")
    });

    match loaded {
        Ok(batch) => {
            info!("{}", batch.summary());
            session.complete::<String>(ticket, Ok(batch));
        }
        Err(e) => {
            session.complete::<String>(ticket, Err(format!("{:#}", e)));
            return Err(e);
        }
    }

    debug!("Session status: {:?}", session.status());
    match (session.status(), session.current()) {
        (ViewStatus::Ready, Some(batch)) => Ok(batch),
        (status, _) => anyhow::bail!("Batch not available (status {:?})", status),
    }
}

/// Read raw JSON from the configured source
///
/// **Private** - internal helper for load_batch
fn read_raw(args: &ViewArgs) -> Result<serde_json::Value> {
    if let Some(url) = &args.url {
        let client = EventClient::new(url.as_str()).context("Failed to create HTTP client")?;
        return client
            .fetch()
            .with_context(|| format!("Failed to fetch events from {}", url));
    }

    let path = args.input.as_ref().context("No input source given")?;
    read_events_file(path).with_context(|| format!("Failed to read events from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file_args() -> ViewArgs {
        ViewArgs {
            input: Some(PathBuf::from("events.json")),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_view_args_valid() {
        assert!(validate_view_args(&file_args()).is_ok());
    }

    #[test]
    fn test_validate_view_args_needs_one_source() {
        assert!(validate_view_args(&ViewArgs::default()).is_err());

        let both = ViewArgs {
            url: Some("http://localhost:3000".to_string()),
            ..file_args()
        };
        assert!(validate_view_args(&both).is_err());
    }

    #[test]
    fn test_validate_view_args_invalid_url_scheme() {
        let args = ViewArgs {
            url: Some("ftp://localhost".to_string()),
            ..Default::default()
        };
        assert!(validate_view_args(&args).is_err());
    }

    #[test]
    fn test_validate_view_args_bad_values() {
        for args in [
            ViewArgs { scope: "bips".to_string(), ..file_args() },
            ViewArgs { dimension: "colour".to_string(), ..file_args() },
            ViewArgs { dimension: "participants".to_string(), ..file_args() },
            ViewArgs { month: Some("2024-13".to_string()), ..file_args() },
            ViewArgs { participants: vec!["Stagnant".to_string()], ..file_args() },
            ViewArgs { categories: vec![" ".to_string()], ..file_args() },
        ] {
            assert!(validate_view_args(&args).is_err(), "{:?}", args);
        }
    }

    #[test]
    fn test_resolve_cross_view() {
        let args = ViewArgs {
            cross: true,
            scope: "eips".to_string(),
            month: Some("2024-03".to_string()),
            participants: vec!["Stagnant".to_string()],
            ..file_args()
        };
        let view = resolve_view(&args).unwrap();

        assert_eq!(view.dimensions, Dimensions::CROSS);
        assert_eq!(view.scope, Scope::Eips);
        assert!(view.filters.secondary.allows("Stagnant"));
        assert!(!view.filters.secondary.allows("Awaited"));
        assert!(view.filters.primary.allows("Typo"));
    }

    #[test]
    fn test_failed_load_marks_session() {
        let session = ViewSession::new();
        let args = ViewArgs {
            input: Some(PathBuf::from("/nonexistent/events.json")),
            ..Default::default()
        };

        assert!(load_batch(&args, &session).is_err());
        assert!(matches!(session.status(), ViewStatus::Failed(_)));
        assert!(session.current().is_none());
    }
}
