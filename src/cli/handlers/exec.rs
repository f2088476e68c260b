// EN: src/cli/handlers/exec.rs

//! `dev exec`: runs an ad-hoc script given on the command line.

use anyhow::Result;
use clap::Parser;

use crate::models::ExecutionRequest;

use super::commons::{self, OptionFlags, Session};

#[derive(Parser, Debug)]
#[command(no_binary_name = true)]
struct ExecArgs {
    /// The script text to run. Quote it to pass several commands.
    script: String,
    /// Variables for the script, as name=value.
    #[arg(value_name = "NAME=VALUE")]
    assignments: Vec<String>,
    #[command(flatten)]
    flags: OptionFlags,
}

/// The main handler for the `exec` command: runs ad-hoc script text without a devfile.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    let exec_args = ExecArgs::try_parse_from(&args)?;

    let mut request = ExecutionRequest::new(exec_args.script);
    commons::apply_assignments(&mut request, &exec_args.assignments)?;
    exec_args.flags.apply(&mut request);

    let report = session.dispatcher()?.execute(&request)?;
    commons::report_outcome(&report, session.config())
}
