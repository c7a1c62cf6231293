use std::path::PathBuf;

/// Source, scope, dimension and filter arguments shared by `chart` and `export`
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ViewArgs {
    /// JSON batch file
    pub input: Option<PathBuf>,

    /// HTTP endpoint serving the batch
    pub url: Option<String>,

    /// Repository scope (eips, ercs, rips, all)
    pub scope: String,

    /// Dimension for the one-dimensional view (label, process)
    pub dimension: String,

    /// Cross-tabulate process × participants
    pub cross: bool,

    /// Restrict to one month (YYYY-MM)
    pub month: Option<String>,

    /// Enabled first-dimension categories (empty = all)
    pub categories: Vec<String>,

    /// Enabled participant categories (empty = all)
    pub participants: Vec<String>,

    /// TOML rule overrides
    pub rules: Option<PathBuf>,

    /// Add a bot label to records authored by bots
    pub tag_bots: bool,
}

impl Default for ViewArgs {
    fn default() -> Self {
        Self {
            input: None,
            url: None,
            scope: "all".to_string(),
            dimension: "label".to_string(),
            cross: false,
            month: None,
            categories: Vec::new(),
            participants: Vec::new(),
            rules: None,
            tag_bots: false,
        }
    }
}

/// Arguments for the chart command
#[derive(Debug, Clone)]
pub struct ChartArgs {
    pub view: ViewArgs,

    /// timeline, primary-axis or secondary-axis
    pub layout: String,

    /// Output path for the JSON chart (stdout when absent)
    pub output: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ChartArgs {
    fn default() -> Self {
        Self {
            view: ViewArgs::default(),
            layout: "timeline".to_string(),
            output: None,
            print_summary: false,
        }
    }
}

/// Arguments for the export command
#[derive(Debug, Clone)]
pub struct ExportArgs {
    pub view: ViewArgs,

    /// Output path for the CSV file
    pub output: PathBuf,

    /// Field delimiter
    pub delimiter: char,
}

impl Default for ExportArgs {
    fn default() -> Self {
        Self {
            view: ViewArgs::default(),
            output: PathBuf::from("export.csv"),
            delimiter: crate::utils::config::DEFAULT_DELIMITER,
        }
    }
}
