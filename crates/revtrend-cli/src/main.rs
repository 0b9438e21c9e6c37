mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "revtrend",
    version,
    about = "Extract segment revenue from quarterly trend reports and compute growth"
)]
struct Cli {
    /// Log extraction details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which extraction profile to use. Defaults to the "nvidia" preset.
#[derive(Args, Clone)]
pub struct ProfileArgs {
    /// Predefined profile: nvidia, generic
    #[arg(short, long = "profile", value_name = "NAME", conflicts_with = "profile_file")]
    pub profile: Option<String>,

    /// Custom JSON profile file
    #[arg(long = "profile-file", value_name = "FILE")]
    pub profile_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the quarterly revenue series from a report (PDF or XLSX)
    Parse {
        /// Path to PDF or XLSX file
        input_file: PathBuf,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the extracted series to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Compute QoQ, YoY and CAGR growth (report or saved series JSON)
    Growth {
        /// Path to PDF, XLSX or series JSON file
        input_file: PathBuf,

        #[command(flatten)]
        profile: ProfileArgs,

        /// CAGR baseline period, e.g. "Q1 FY24" (default: first period)
        #[arg(short, long, value_name = "PERIOD")]
        baseline: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Import every report in a directory into the SQLite history
    Import {
        /// Directory holding quarterly reports
        dir: PathBuf,

        #[command(flatten)]
        profile: ProfileArgs,

        /// SQLite database file
        #[arg(long, default_value = "revenue.db", value_name = "FILE")]
        db: PathBuf,
    },
    /// Export the stored history as CSV and/or JSON
    Export {
        /// SQLite database file
        #[arg(long, default_value = "revenue.db", value_name = "FILE")]
        db: PathBuf,

        /// Write CSV to this file
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        /// Write series JSON to this file
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// Only the N most recent quarters
        #[arg(long, value_name = "N")]
        latest: Option<usize>,
    },
    /// Print the report in a directory covering the latest quarter
    Latest {
        /// Directory holding quarterly reports
        dir: PathBuf,
    },
    /// Manage and inspect extraction profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },
}

#[derive(Subcommand)]
enum ProfilesAction {
    /// List predefined profiles
    List,
    /// Print a predefined profile as JSON
    Show {
        /// Preset name (e.g., "nvidia")
        name: String,
    },
    /// Validate a custom profile file
    Validate {
        /// Path to JSON profile file
        file: PathBuf,
    },
}

/// Log to stderr so stdout stays clean for table and JSON output.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!("logging initialized");

    let result = match cli.command {
        Commands::Parse {
            input_file,
            profile,
            output,
            out,
        } => commands::parse::run(input_file, &profile, &output, out),
        Commands::Growth {
            input_file,
            profile,
            baseline,
            output,
        } => commands::growth::run(input_file, &profile, baseline.as_deref(), &output),
        Commands::Import { dir, profile, db } => commands::import::run(&dir, &profile, &db),
        Commands::Export {
            db,
            csv,
            json,
            latest,
        } => commands::export::run(&db, csv, json, latest),
        Commands::Latest { dir } => commands::latest::run(&dir),
        Commands::Profiles { action } => match action {
            ProfilesAction::List => commands::profiles::list(),
            ProfilesAction::Show { name } => commands::profiles::show(&name),
            ProfilesAction::Validate { file } => commands::profiles::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
