// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `buildwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "buildwatch",
    version,
    about = "Watch a C project and bump the build version header on every source change.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory to watch (the project root).
    ///
    /// Default: current working directory.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: String,

    /// Path to the config file (TOML).
    ///
    /// Default: `Buildwatch.toml` in the watched directory, if present;
    /// otherwise built-in defaults are used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Advance the version, write the header and state, run the build once,
    /// then exit without watching.
    #[arg(long)]
    pub once: bool,

    /// Print the resolved config and current persisted version, but don't
    /// watch or execute anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BUILDWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
