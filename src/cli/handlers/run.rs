// EN: src/cli/handlers/run.rs

//! `dev run`: executes a named devfile operation.

use anyhow::Result;
use clap::Parser;
use colored::*;

use super::commons::{self, OptionFlags, Session};

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct RunArgs {
    /// The devfile operation to run.
    operation: String,
    /// Variables for the script, as name=value. They override the devfile's variables.
    #[arg(value_name = "NAME=VALUE")]
    assignments: Vec<String>,
    #[command(flatten)]
    flags: OptionFlags,
}

/// The main handler for the `run` command.
/// Also reached through the shortcut `dev <operation> ...`.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;

    // 1. The operation comes from the nearest devfile.
    let devfile = session.load_devfile()?;
    let operation = devfile.operation(&run_args.operation)?;

    // 2. CLI variables override the devfile's, CLI flags add to the operation's options.
    let mut request = operation.to_request();
    commons::apply_assignments(&mut request, &run_args.assignments)?;
    run_args.flags.apply(&mut request);

    if request.script.trim().is_empty() {
        println!("{}", "Operation script is empty. Nothing to execute.".yellow());
        return Ok(());
    }

    log::debug!(
        "Running operation '{}' from '{}'",
        run_args.operation,
        devfile.absolute_path().display()
    );
    let report = session.dispatcher()?.execute(&request)?;
    commons::report_outcome(&report, session.config())
}
