//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect, compare and mirror directory-persisted management trees
#[derive(Parser, Debug)]
#[command(name = "mgmt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the directory-safe form of a resource or type name
    Encode {
        /// Name to escape
        name: String,
    },

    /// Print the original form of an escaped name
    Decode {
        /// Escaped name
        name: String,
    },

    /// Print a persisted tree
    Show {
        /// Root directory of the persisted tree
        dir: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the operations that turn one persisted tree into another
    ///
    /// Examples:
    ///   mgmt diff live/ edited/                  # CLI-form operations
    ///   mgmt diff live/ edited/ --json           # request documents
    ///   mgmt diff live/ edited/ -i host          # leave host out
    Diff {
        /// Tree the operations apply to
        actual: PathBuf,

        /// Tree the operations lead to
        target: PathBuf,

        /// Output as JSON request documents
        #[arg(long)]
        json: bool,

        /// Top-level child type to leave out (repeatable)
        #[arg(short = 'i', long = "ignore-type")]
        ignore_types: Vec<String>,
    },

    /// Persist the tree read from one directory into another
    Mirror {
        /// Source tree
        src: PathBuf,

        /// Destination directory, created if missing
        dst: PathBuf,

        /// Keep destination entries that have no counterpart in the source
        #[arg(long)]
        keep_extraneous: bool,

        /// Write order.txt manifests
        #[arg(long)]
        order_files: bool,
    },
}
