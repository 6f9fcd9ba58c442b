//! CLI argument definitions for the census tool.

use std::path::PathBuf;

use censo_cli::request::parse_report_date;
use censo_model::Coordination;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "censo",
    version,
    about = "Hospital bed census classifier - build epidemiology and supplies workbooks",
    long_about = "Read the daily bed-census HTML export, classify every patient by \
                  specialty and coordination, and write the epidemiology census or \
                  the supplies report as an xlsx workbook."
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

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient names and registry ids in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Rule catalog to use instead of the built-in one (also CENSO_RULES).
    #[arg(long = "rules", value_name = "PATH", global = true)]
    pub rules: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the specialties found in a census, grouped by coordination.
    Specialties(SpecialtiesArgs),

    /// Write the general epidemiology census workbook.
    Census(ReportArgs),

    /// Write the supplies workbook (one sheet per supply-filter specialty).
    Supplies(ReportArgs),

    /// Show the effective rule catalog.
    Rules(RulesArgs),
}

#[derive(Parser)]
pub struct SpecialtiesArgs {
    /// Census HTML export.
    #[arg(value_name = "HTML")]
    pub input: PathBuf,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Census HTML export.
    #[arg(value_name = "HTML")]
    pub input: PathBuf,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Report date, DD/MM/YYYY (default: today).
    #[arg(long = "date", value_name = "DATE", value_parser = parse_report_date)]
    pub date: Option<NaiveDate>,

    /// Output file or directory (default: current directory).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct SelectionArgs {
    /// Select every coordination present in the census.
    #[arg(long = "all", conflicts_with_all = ["coordination", "specialty"])]
    pub all: bool,

    /// Select a whole coordination (repeatable), e.g. MEDICINA or COORD_CIRUGIA.
    #[arg(long = "coordination", short = 'c', value_name = "NAME")]
    pub coordination: Vec<Coordination>,

    /// Select a single specialty (repeatable).
    #[arg(long = "specialty", short = 's', value_name = "NAME")]
    pub specialty: Vec<String>,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// Print the catalog as JSON.
    #[arg(long = "json")]
    pub json: bool,
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
