//! Command-line arguments.

use std::io::{self, IsTerminal};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use grouper_cli::logging::{LogConfig, LogFormat};
use grouper_model::{GroupingOptions, PrincipalMode, ValidationMode};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "grouper",
    version,
    about = "Assign medical services to hospitalization cases",
    long_about = "Assign medical services to hospitalization cases.\n\n\
                  Reads a `;`-separated case file, evaluates every case against the\n\
                  annex tables and writes `<input>_output.csv` with an `ms` column."
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

    /// Log output format.
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

    /// Include case identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

impl Cli {
    /// `--log-level` beats `-v/-q`; `RUST_LOG` only applies when neither is given.
    pub fn log_config(&self) -> LogConfig {
        let level_filter = self
            .log_level
            .map_or_else(|| self.verbosity.tracing_level_filter(), LevelFilter::from);
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter,
            use_env_filter: !(self.verbosity.is_present() || self.log_level.is_some()),
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            log_data: self.log_data,
            ..LogConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Group a case file and write the result file.
    Group(GroupArgs),

    /// List the loaded annex tables and derived lists.
    Tables(TablesArgs),
}

#[derive(Args)]
pub struct GroupArgs {
    /// Case file: `;`-separated, no header row.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Result file (default: <INPUT stem>_output.csv next to the input).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Annex table directory (default: $GROUPER_ANNEX_DIR, then ./Prilohy).
    #[arg(long = "annex-dir", value_name = "DIR")]
    pub annex_dir: Option<PathBuf>,

    /// Let every reported procedure act as the principal one.
    #[arg(long = "combinatorial-principal")]
    pub combinatorial_principal: bool,

    /// Treat missing or invalid fields as unknown instead of rejecting the row.
    #[arg(long = "lenient")]
    pub lenient: bool,

    /// Insurer export profile: same as --lenient --combinatorial-principal.
    #[arg(long = "iza")]
    pub iza: bool,

    /// Worker threads (default: available parallelism).
    #[arg(long = "jobs", short = 'j', value_name = "N")]
    pub jobs: Option<NonZeroUsize>,

    /// Also write the run summary as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

impl GroupArgs {
    pub fn grouping_options(&self) -> GroupingOptions {
        let mut options = if self.iza {
            GroupingOptions::iza()
        } else {
            GroupingOptions::new()
        };
        if self.combinatorial_principal {
            options = options.with_principal_mode(PrincipalMode::Combinatorial);
        }
        if self.lenient {
            options = options.with_validation_mode(ValidationMode::Lenient);
        }
        options
    }
}

#[derive(Args)]
pub struct TablesArgs {
    /// Annex table directory (default: $GROUPER_ANNEX_DIR, then ./Prilohy).
    #[arg(long = "annex-dir", value_name = "DIR")]
    pub annex_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
