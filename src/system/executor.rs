// EN: src/system/executor.rs

//! Blocking process execution through the host shell.

use crate::models::RunOutcome;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

/// Failures to start a process. A process that runs and exits non-zero is not an error.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The command line was blank.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The shell could not be spawned or waited on.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
}

/// Runs a complete command line and waits for it.
///
/// The command line is interpreted by a shell, so it may carry redirections such as a profile's
/// silence token.
pub trait ProcessRunner {
    /// Runs `command_line`, blocking the calling thread until the process exits.
    ///
    /// # Errors
    /// Fails only when the process could not be started. A non-zero exit code is reported in the
    /// returned [`RunOutcome`], not as an error.
    fn run(&self, command_line: &str) -> Result<RunOutcome, ExecutionError>;
}

/// Runs command lines through the shell of the machine the binary runs on:
/// `sh -c` on Unix-like hosts (WSL included), `cmd /C` on Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command_line: &str) -> Result<RunOutcome, ExecutionError> {
        let trimmed_command = command_line.trim();
        if trimmed_command.is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }

        log::debug!("Running: {}", trimmed_command);
        let status = host_shell(trimmed_command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| ExecutionError::CommandFailed(trimmed_command.to_string(), e))?;

        let outcome = RunOutcome {
            code: status.code(),
        };
        if !outcome.success() {
            log::debug!(
                "Command '{}' exited with code: {:?}",
                trimmed_command,
                outcome.code
            );
        }
        Ok(outcome)
    }
}

#[cfg(windows)]
fn host_shell(command_line: &str) -> StdCommand {
    use std::os::windows::process::CommandExt;

    // cmd.exe does its own parsing; hand it the line untouched.
    let mut command = StdCommand::new("cmd");
    command.arg("/C").raw_arg(command_line);
    command
}

#[cfg(not(windows))]
fn host_shell(command_line: &str) -> StdCommand {
    let mut command = StdCommand::new("sh");
    command.arg("-c").arg(command_line);
    command
}
