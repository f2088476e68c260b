// src/cli/handlers/commons.rs

//! Shared functions used by multiple handlers.

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{
    core::{
        config::UserConfig,
        detection::{self, NativeHost},
        devfile::Devfile,
        dispatcher::Dispatcher,
    },
    models::{ExecutionReport, ExecutionRequest, OpOption},
    system::{executor::SystemRunner, fs::LocalFileSystem},
};

/// The dispatcher used by the binary.
pub type NativeDispatcher = Dispatcher<LocalFileSystem, SystemRunner>;

/// Raised when a script fails and the user asked for its exit code to be propagated.
#[derive(Error, Debug)]
#[error("Script exited with code {code}.")]
pub struct ScriptFailed {
    /// The script's exit code, or 1 when it was killed by a signal.
    pub code: i32,
}

/// State shared by the handlers of one invocation.
///
/// The environment profile is detected the first time a handler needs the dispatcher, and only
/// once. Actions that never execute anything (`init`, `list`) work on any host.
#[derive(Debug)]
pub struct Session {
    config: UserConfig,
    working_dir: PathBuf,
    dispatcher: Option<NativeDispatcher>,
}

impl Session {
    /// Creates a session. Nothing is detected yet.
    pub fn new(config: UserConfig, working_dir: PathBuf) -> Self {
        Self {
            config,
            working_dir,
            dispatcher: None,
        }
    }

    /// The loaded user configuration.
    pub fn config(&self) -> &UserConfig {
        &self.config
    }

    /// Directory the devfile search starts from.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Returns the dispatcher, detecting the environment profile on first use.
    pub fn dispatcher(&mut self) -> Result<&mut NativeDispatcher> {
        let dispatcher = match self.dispatcher.take() {
            Some(dispatcher) => dispatcher,
            None => {
                let profile = detection::detect_profile(&NativeHost)?;
                let settings = self.config.dispatcher_settings()?;
                Dispatcher::new(profile, settings, LocalFileSystem::new(), SystemRunner)
            }
        };
        Ok(self.dispatcher.insert(dispatcher))
    }

    /// Finds and parses the devfile governing the working directory.
    pub fn load_devfile(&self) -> Result<Devfile> {
        Ok(Devfile::load(&self.working_dir, &self.config.devfile_name)?)
    }
}

/// Option flags shared by `run` and `exec`.
#[derive(clap::Args, Debug, Default, Clone, Copy)]
pub struct OptionFlags {
    /// Discard the script's standard output.
    #[arg(short, long)]
    pub quiet: bool,
    /// Keep the staged script file after it ran.
    #[arg(short, long)]
    pub keep: bool,
    /// From WSL, run the script as a Windows batch file on the Windows filesystem.
    #[arg(short = 'w', long = "windows-fs")]
    pub windows_fs: bool,
}

impl OptionFlags {
    /// Adds the selected flags to the request's options.
    pub fn apply(&self, request: &mut ExecutionRequest) {
        let selected = [
            (self.quiet, OpOption::Quiet),
            (self.keep, OpOption::Keep),
            (self.windows_fs, OpOption::WindowsFsBridge),
        ];
        for (enabled, option) in selected {
            if enabled {
                request.options.insert(option);
            }
        }
    }
}

/// Splits a `name=value` argument at its first `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected 'name=value', got '{}'.", raw))?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(anyhow!("Invalid variable name in '{}'.", raw));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Parses every assignment and sets it on the request, overriding existing values.
pub fn apply_assignments(request: &mut ExecutionRequest, assignments: &[String]) -> Result<()> {
    for raw in assignments {
        let (name, value) =
            parse_assignment(raw).with_context(|| "Variables are passed as name=value")?;
        request.variables.insert(name, value);
    }
    Ok(())
}

/// Tells the user what happened after an execution.
///
/// A failing script only produces a warning unless `propagate_exit_status` is set.
pub fn report_outcome(report: &ExecutionReport, config: &UserConfig) -> Result<()> {
    if report.kept {
        println!(
            "{}",
            format!("Staged script kept at '{}'", report.staged_path.display()).dimmed()
        );
    }

    if report.outcome.success() {
        return Ok(());
    }

    log::warn!(
        "'{}' exited with code: {:?}",
        report.command_line,
        report.outcome.code
    );
    if config.propagate_exit_status {
        return Err(ScriptFailed {
            code: report.outcome.code.unwrap_or(1),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::profile::EnvironmentProfile, models::RunOutcome};

    fn report_with_code(code: Option<i32>) -> ExecutionReport {
        ExecutionReport {
            profile: EnvironmentProfile::Linux,
            staged_path: PathBuf::from("/tmp/devfiles/x.dev"),
            command_line: "/bin/bash /tmp/devfiles/x.dev".to_string(),
            outcome: RunOutcome { code },
            kept: false,
        }
    }

    #[test]
    fn test_parse_assignment_splits_at_first_equals() {
        assert_eq!(
            parse_assignment("url=http://x?a=b").unwrap(),
            ("url".to_string(), "http://x?a=b".to_string())
        );
        assert_eq!(
            parse_assignment("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_assignment_rejects_malformed_input() {
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=value").is_err());
        assert!(parse_assignment("two words=1").is_err());
    }

    #[test]
    fn test_apply_assignments_overrides_existing_values() {
        let mut request = ExecutionRequest::new("echo").with_variable("mode", "debug");
        apply_assignments(&mut request, &["mode=release".to_string(), "arch=x64".to_string()])
            .unwrap();
        assert_eq!(request.variables.get("mode").map(String::as_str), Some("release"));
        assert_eq!(request.variables.get("arch").map(String::as_str), Some("x64"));
    }

    #[test]
    fn test_option_flags_are_added() {
        let mut request = ExecutionRequest::new("echo").with_option(OpOption::Keep);
        let flags = OptionFlags {
            quiet: true,
            ..OptionFlags::default()
        };
        flags.apply(&mut request);
        assert!(request.has(OpOption::Quiet));
        assert!(request.has(OpOption::Keep));
        assert!(!request.has(OpOption::WindowsFsBridge));
    }

    #[test]
    fn test_failure_is_only_a_warning_by_default() {
        let config = UserConfig::default();
        assert!(report_outcome(&report_with_code(Some(2)), &config).is_ok());
    }

    #[test]
    fn test_failure_propagates_when_configured() {
        let config = UserConfig {
            propagate_exit_status: true,
            ..UserConfig::default()
        };
        let err = report_outcome(&report_with_code(Some(2)), &config).unwrap_err();
        assert_eq!(err.downcast_ref::<ScriptFailed>().map(|e| e.code), Some(2));

        let signalled = report_outcome(&report_with_code(None), &config).unwrap_err();
        assert_eq!(signalled.downcast_ref::<ScriptFailed>().map(|e| e.code), Some(1));
        assert!(report_outcome(&report_with_code(Some(0)), &config).is_ok());
    }
}
