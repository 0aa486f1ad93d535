use clap::Parser;
use std::path::PathBuf;

/// repoclip – pick files, directories and extensions of a repository to export
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan (defaults to CWD)
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Load a raw JSON tree instead of scanning DIR. Only the selection JSON can be produced.
    #[arg(long, value_name = "FILE")]
    pub tree: Option<PathBuf>,

    /// Scanner configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Include files ignored by .gitignore
    #[arg(long)]
    pub include_ignored: bool,

    /// Apply the selection flags below and exit without the interactive view.
    #[arg(long)]
    pub headless: bool,

    /// Start from an empty selection instead of everything.
    #[arg(long)]
    pub none: bool,

    /// Deselect every file with this suffix (e.g. ".md"). Repeatable.
    #[arg(long, value_name = "SUFFIX")]
    pub exclude_ext: Vec<String>,

    /// Select every file with this suffix. Repeatable.
    #[arg(long, value_name = "SUFFIX")]
    pub include_ext: Vec<String>,

    /// Deselect a file or directory (relative path, "" for the root). Repeatable.
    #[arg(long, value_name = "PATH")]
    pub exclude: Vec<String>,

    /// Select a file or directory (relative path, "" for the root). Repeatable.
    #[arg(long, value_name = "PATH")]
    pub include: Vec<String>,

    /// Print the selection lists as JSON instead of rendering file contents.
    #[arg(long)]
    pub json: bool,

    /// Print the output instead of copying it to the clipboard.
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    pub verbose: bool,
}
