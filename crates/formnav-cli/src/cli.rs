//! CLI argument definitions for formnav.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "formnav",
    version,
    about = "Inspect and walk hierarchical multi-step forms",
    long_about = "Inspect and walk hierarchical multi-step forms.\n\n\
                  A form is described by a JSON blueprint of cards, sets, groups,\n\
                  fields and inputs. Navigation moves by field, group, set or card."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// List every discovered node with its ancestor chain.
    Inspect(InspectArgs),

    /// Initialise a form, apply moves and print the resulting state.
    Walk(WalkArgs),
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Path to the JSON form blueprint.
    #[arg(value_name = "BLUEPRINT")]
    pub blueprint: PathBuf,
}

#[derive(Parser)]
pub struct WalkArgs {
    /// Path to the JSON form blueprint.
    #[arg(value_name = "BLUEPRINT")]
    pub blueprint: PathBuf,

    /// TOML file with form options.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Navigation behavior (byField, byGroup, bySet, byCard). Overrides the
    /// config file.
    #[arg(long = "behavior", value_name = "BEHAVIOR")]
    pub behavior: Option<String>,

    /// Comma-separated moves to apply in order (next, prev).
    #[arg(long = "moves", value_name = "MOVES", value_delimiter = ',')]
    pub moves: Vec<String>,

    /// Print the final state as flat JSON instead of a table.
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
