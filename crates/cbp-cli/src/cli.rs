//! CLI argument definitions for the study validator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "cbp-validate",
    version,
    about = "Validate cBioPortal study directories before import",
    long_about = "Check a cBioPortal study directory (meta files, data files and case lists) \
                  against the file formats the importer expects.\n\n\
                  Exit status: 0 succeeded, 1 failed, 2 not performed, 3 succeeded with warnings."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Include timestamps in log lines.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a study directory (or a directory of extra data files).
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Study directory containing meta_study and the other meta/data files.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// DIR holds data files for an existing study; skip study-level checks.
    #[arg(long = "data-directory")]
    pub data_directory: bool,

    /// Offline portal-info directory (defaults to $PORTAL_INFO_DIR).
    #[arg(
        long = "portal-info-dir",
        value_name = "DIR",
        conflicts_with_all = ["portal_url", "no_portal_checks"]
    )]
    pub portal_info_dir: Option<PathBuf>,

    /// Base URL of a running portal to fetch reference data from.
    #[arg(long = "portal-url", value_name = "URL", conflicts_with = "no_portal_checks")]
    pub portal_url: Option<String>,

    /// Skip every check against portal reference data.
    #[arg(long = "no-portal-checks")]
    pub no_portal_checks: bool,

    /// Write an HTML table of the findings.
    #[arg(long = "html-table", value_name = "PATH")]
    pub html_table: Option<PathBuf>,

    /// Write warnings and errors to a plain text file.
    #[arg(long = "error-file", value_name = "PATH")]
    pub error_file: Option<PathBuf>,

    /// Keep scanning clinical files whose header definitions are invalid.
    #[arg(long = "relaxed-clinical-definitions")]
    pub relaxed_clinical_definitions: bool,

    /// Report selected mutation file warnings as errors.
    #[arg(long = "strict-maf-checks")]
    pub strict_maf_checks: bool,

    /// Number of values listed in summary messages before truncating.
    #[arg(long = "max-reported-values", value_name = "N")]
    pub max_reported_values: Option<usize>,

    /// TOML file with validation option defaults.
    #[arg(long = "options", value_name = "PATH")]
    pub options: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
