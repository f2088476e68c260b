// src/cli/mod.rs

//! Command-line surface of the `dev` binary.

use clap::Parser;

pub mod handlers;

/// dev: runs devfile operations through the native shell of the host.
///
/// Usage:
/// - `dev <operation> [name=value ...] [-q] [-k] [-w]` runs an operation of the nearest
///   `devfile.toml` (shortcut for `dev run <operation> ...`).
/// - `dev exec <script> [name=value ...] [-q] [-k] [-w]` runs ad-hoc script text.
/// - `dev edit` opens the devfile in the editor of the host.
/// - `dev list` lists the operations of the devfile.
/// - `dev init` writes a starter devfile into the working directory.
/// - `dev profile` shows the detected environment and its conventions.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// A system action or the name of a devfile operation.
    pub action_or_operation: Option<String>,

    /// All remaining arguments, passed to the action unchanged.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
