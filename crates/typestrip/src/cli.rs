//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Strips TypeScript types from a project tree, leaving plain JavaScript.
#[derive(Debug, Parser)]
#[command(name = "typestrip")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Convert a single file instead of the configured source roots
    pub file: Option<Utf8PathBuf>,

    /// Working directory that roots and the config file resolve against
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Path to typestrip.json
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Source root to convert (repeatable)
    #[arg(long = "src", value_name = "DIR")]
    pub src: Vec<Utf8PathBuf>,

    /// Destination root mirroring the source roots
    #[arg(long, value_name = "DIR", conflicts_with = "in_place")]
    pub out: Option<Utf8PathBuf>,

    /// Write each output next to its source
    #[arg(long = "in-place")]
    pub in_place: bool,

    /// Remove each source after its output is safely written
    #[arg(long = "delete-original")]
    pub delete_original: bool,

    /// Directory name to skip, added to the defaults (repeatable)
    #[arg(long, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Glob patterns to ignore, relative to the source root
    #[arg(long, value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Leave destinations whose content would not change untouched
    #[arg(long = "skip-unchanged")]
    pub skip_unchanged: bool,

    /// Fail files the parser rejects instead of using the lexical fallback
    #[arg(long)]
    pub strict: bool,

    /// Drop named imports that are only used as types
    #[arg(long = "elide-type-imports")]
    pub elide_type_imports: bool,

    /// Convert CRLF line endings to LF
    #[arg(long)]
    pub lf: bool,

    /// Report what would be written without touching the filesystem
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print the converted file instead of writing it
    #[arg(long, requires = "file")]
    pub stdout: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Print timing breakdowns
    #[arg(long)]
    pub timings: bool,

    /// Log file state transitions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// One JSON document with per-file records and the summary
    Json,
}
