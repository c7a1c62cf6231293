//! PR Label Analytics CLI
//!
//! Charts and exports month-bucketed PR label activity.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use pr_label_analytics::commands::{
    display_rules, display_version, execute_chart, execute_export, ChartArgs, ExportArgs, ViewArgs,
};
use pr_label_analytics::utils::config::DEFAULT_DELIMITER;

/// PR Label Analytics - categorical time series for proposal pull requests
#[derive(Parser, Debug)]
#[command(name = "pr-label-analytics")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Source, scope and filter flags shared by chart and export
#[derive(Args, Debug)]
struct ViewOpts {
    /// JSON file holding the raw event batch
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// HTTP endpoint serving the raw event batch
    #[arg(long)]
    url: Option<String>,

    /// Repository scope: eips, ercs, rips or all
    #[arg(short, long, default_value = "all")]
    scope: String,

    /// Dimension for the one-dimensional view: label or process
    #[arg(short, long, default_value = "label")]
    dimension: String,

    /// Cross-tabulate process x participants
    #[arg(long)]
    cross: bool,

    /// Restrict to one month (YYYY-MM)
    #[arg(short, long)]
    month: Option<String>,

    /// Enabled category (repeatable; default all)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Enabled participant state (repeatable; requires --cross)
    #[arg(long = "participant")]
    participants: Vec<String>,

    /// TOML file with rule overrides
    #[arg(long, env = "PR_LABEL_RULES")]
    rules: Option<PathBuf>,

    /// Add a "Created By Bot" label to records authored by bots
    #[arg(long)]
    tag_bots: bool,
}

impl From<ViewOpts> for ViewArgs {
    fn from(opts: ViewOpts) -> Self {
        ViewArgs {
            input: opts.input,
            url: opts.url,
            scope: opts.scope,
            dimension: opts.dimension,
            cross: opts.cross,
            month: opts.month,
            categories: opts.categories,
            participants: opts.participants,
            rules: opts.rules,
            tag_bots: opts.tag_bots,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate a batch and build chart series
    Chart {
        #[command(flatten)]
        view: ViewOpts,

        /// timeline, primary-axis or secondary-axis
        #[arg(short, long, default_value = "timeline")]
        layout: String,

        /// Output path for the JSON chart (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Export the charted units as CSV rows
    Export {
        #[command(flatten)]
        view: ViewOpts,

        /// Output path for the CSV file
        #[arg(short, long, default_value = "export.csv")]
        output: PathBuf,

        /// Field delimiter
        #[arg(long, default_value_t = DEFAULT_DELIMITER)]
        delimiter: char,
    },

    /// Print the active normalization rules
    Rules {
        /// Dimension: label, process or participants
        #[arg(short, long, default_value = "label")]
        dimension: String,

        /// Repository scope: eips, ercs, rips or all
        #[arg(short, long, default_value = "all")]
        scope: String,

        /// TOML file with rule overrides
        #[arg(long, env = "PR_LABEL_RULES")]
        rules: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Chart {
            view,
            layout,
            output,
            summary,
        } => {
            let args = ChartArgs {
                view: view.into(),
                layout,
                output,
                print_summary: summary,
            };
            execute_chart(args)?;
        }

        Commands::Export {
            view,
            output,
            delimiter,
        } => {
            let args = ExportArgs {
                view: view.into(),
                output,
                delimiter,
            };
            execute_export(args)?;
        }

        Commands::Rules {
            dimension,
            scope,
            rules,
        } => {
            display_rules(&dimension, &scope, rules.as_deref())?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
