use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sitescore",
    version,
    about = "Score and compare candidate building sites"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Workspace holding sitescore.toml and the registry file
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the criterion catalog in use
    Catalog(CatalogCommand),
    /// Register a new site
    Add(AddCommand),
    /// Delete a site
    Remove(RemoveCommand),
    /// List all sites with their totals
    List,
    /// Show the full report for one site
    Show(ShowCommand),
    /// Record or clear questionnaire answers and re-score
    Answer(AnswerCommand),
    /// Set, geocode or clear the coordinates of a site
    Locate(LocateCommand),
    /// Replace the notes of a site
    Note(NoteCommand),
    /// Filter sites by text, location, attributes and scores
    Search(SearchCommand),
    /// Rank sites by total score
    Compare(CompareCommand),
    /// Export all sites
    Export(ExportCommand),
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Md,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum Mode {
    And,
    Or,
}

#[derive(Args)]
pub struct CatalogCommand {
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct AddCommand {
    pub name: String,
    /// Evaluation date as YYYY-MM-DD; defaults to today
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
    /// Plot area in square metres
    #[arg(long)]
    pub area: Option<f64>,
    /// Environmental category, I to IV
    #[arg(long)]
    pub class: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct RemoveCommand {
    pub name: String,
}

#[derive(Args)]
pub struct ShowCommand {
    pub name: String,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct AnswerCommand {
    pub name: String,
    /// CRITERION=OPTION, where OPTION is a key, a label or a 1-based position
    #[arg(long = "set", value_name = "CRITERION=OPTION")]
    pub set: Vec<String>,
    /// Criterion whose answer is withdrawn
    #[arg(long = "clear", value_name = "CRITERION")]
    pub clear: Vec<String>,
}

#[derive(Args)]
pub struct LocateCommand {
    pub name: String,
    #[arg(
        long,
        requires = "lon",
        conflicts_with_all = ["address", "clear"],
        allow_negative_numbers = true
    )]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
    /// Geocode this address instead of giving coordinates
    #[arg(long, conflicts_with = "clear")]
    pub address: Option<String>,
    #[arg(long)]
    pub clear: bool,
}

#[derive(Args)]
pub struct NoteCommand {
    pub name: String,
    pub text: String,
}

#[derive(Args)]
pub struct SearchCommand {
    /// Case-insensitive match on name and address
    #[arg(long)]
    pub text: Option<String>,
    #[arg(long)]
    pub min_area: Option<f64>,
    #[arg(long)]
    pub class: Option<String>,
    /// Centre of the radius filter as LAT,LON
    #[arg(long, conflicts_with = "near_address", allow_hyphen_values = true)]
    pub near: Option<String>,
    /// Centre of the radius filter, geocoded
    #[arg(long)]
    pub near_address: Option<String>,
    #[arg(long)]
    pub radius_km: Option<f64>,
    #[arg(long)]
    pub min_total: Option<f64>,
    /// CATEGORY=N, repeatable
    #[arg(long = "min-score", value_name = "CATEGORY=N")]
    pub min_score: Vec<String>,
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,
}

#[derive(Args)]
pub struct CompareCommand {
    /// Sites to rank; all sites when omitted
    pub names: Vec<String>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct ExportCommand {
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
