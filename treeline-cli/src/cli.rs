//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use treeline_core::types::BuildTool;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "treeline.toml";

/// Input argument value that selects stdin instead of a file.
pub const STDIN_INPUT: &str = "-";

/// Treeline -- turn Maven, Gradle and SBT dependency reports into one dependency tree.
///
/// Use `treeline <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "treeline", version, about, long_about = None)]
pub struct Cli {
    /// Path to the treeline.toml configuration file (default: ./treeline.toml if present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tree / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse build tool output into a dependency tree.
    Parse(ParseArgs),

    /// Print every path from the project root to a package.
    Paths(PathsArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

impl Commands {
    /// `config validate` reports a broken config file instead of failing on it.
    pub fn tolerates_invalid_config(&self) -> bool {
        matches!(
            self,
            Commands::Config(ConfigArgs {
                action: ConfigAction::Validate
            })
        )
    }
}

/// Build tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ToolArg {
    /// Detect the tool from the output itself.
    Auto,
    /// `mvn dependency:tree -DoutputType=dot`
    Maven,
    /// `gradle dependencies`
    Gradle,
    /// `sbt dependencyTree`
    Sbt,
}

impl ToolArg {
    /// `None` means auto-detection.
    pub fn build_tool(self) -> Option<BuildTool> {
        match self {
            ToolArg::Auto => None,
            ToolArg::Maven => Some(BuildTool::Maven),
            ToolArg::Gradle => Some(BuildTool::Gradle),
            ToolArg::Sbt => Some(BuildTool::Sbt),
        }
    }
}

/// Arguments shared by every command that reads build tool output.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// File holding the captured tool output, or `-` for stdin.
    pub input: String,

    /// Build tool that produced the output.
    #[arg(long, default_value = "auto")]
    pub tool: ToolArg,

    /// Project name used for the synthetic root (Gradle, SBT).
    #[arg(long, default_value = "root")]
    pub project_name: String,

    /// Project version used for the synthetic root (Gradle, SBT).
    #[arg(long, default_value = "0.0.0")]
    pub project_version: String,
}

impl InputArgs {
    pub fn is_stdin(&self) -> bool {
        self.input == STDIN_INPUT
    }
}

// ---- parse ----

/// Parse build tool output and print the dependency tree.
#[derive(Args, Debug)]
pub struct ParseArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

// ---- paths ----

/// Print every from-root path to a package.
#[derive(Args, Debug)]
pub struct PathsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Package name, e.g. `org.slf4j:slf4j-api`.
    #[arg(short, long)]
    pub package: String,
}

// ---- config ----

/// Manage treeline configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, parser).
        #[arg(long)]
        section: Option<String>,
    },
}
