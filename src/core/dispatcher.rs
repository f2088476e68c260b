// src/core/dispatcher.rs

//! # Dispatcher
//!
//! Stages a script for the active [`EnvironmentProfile`] and runs it through the profile's
//! shell. The profile is resolved once at startup and handed in; the dispatcher owns it from
//! then on.
//!
//! ## Sticky bridge promotion
//!
//! Executing with [`OpOption::WindowsFsBridge`] while the profile is
//! [`EnvironmentProfile::LinuxUnderSubsystem`] promotes the dispatcher's profile to
//! [`EnvironmentProfile::SubsystemAccessingWindowsFS`] permanently. Every later call on the same
//! dispatcher runs bridged, with or without the option. `execute` takes `&mut self` for this
//! reason: a dispatcher is not meant to be shared between threads, callers serialize calls.
//!
//! Staged files are named after a hash of the script text, so two processes running the same
//! script at the same moment write to the same file.

use crate::{
    constants::{
        EXIT_UNSUPPORTED_ENVIRONMENT, EXIT_UNSUPPORTED_EXECUTION_TARGET, STAGING_DIR_NAME,
        WINDOWS_TEMP_FROM_SUBSYSTEM,
    },
    core::{
        devfile::Devfile,
        profile::{Conventions, EnvironmentProfile, OsFamily},
        staging,
    },
    dev_utils::BlockTimer,
    models::{ExecutionReport, ExecutionRequest, OpOption, RunOutcome},
    system::{
        executor::{ExecutionError, ProcessRunner},
        fs::{FileSystem, PathStyle},
    },
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of detection, staging or execution. Each maps to a process exit code.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The host OS family has no profile.
    #[error("{family} is currently not supported by devfile")]
    UnsupportedEnvironment {
        /// The family reported by the host.
        family: OsFamily,
    },
    /// The active profile cannot run scripts.
    #[error("There is currently no support for executing operations on {profile}")]
    UnsupportedExecutionTarget {
        /// The active profile.
        profile: EnvironmentProfile,
    },
    /// The staging directory or file could not be written.
    #[error("Could not stage script at '{path}': {source}")]
    Staging {
        /// The directory or file that failed.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The shell could not be started.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl DispatchError {
    /// The process exit code this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedEnvironment { .. } => EXIT_UNSUPPORTED_ENVIRONMENT,
            Self::UnsupportedExecutionTarget { .. } => EXIT_UNSUPPORTED_EXECUTION_TARGET,
            Self::Staging { .. } | Self::Execution(_) => 1,
        }
    }
}

/// Where scripts are staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherSettings {
    /// Subdirectory of the temp root holding staged scripts.
    pub staging_dir: String,
    /// The Windows temp folder as seen from WSL, used with the bridge option.
    pub windows_temp: PathBuf,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            staging_dir: STAGING_DIR_NAME.to_string(),
            windows_temp: PathBuf::from(WINDOWS_TEMP_FROM_SUBSYSTEM),
        }
    }
}

/// Stages and runs scripts under one profile, through injected filesystem and process
/// capabilities.
#[derive(Debug)]
pub struct Dispatcher<F, R> {
    profile: EnvironmentProfile,
    settings: DispatcherSettings,
    fs: F,
    runner: R,
}

impl<F: FileSystem, R: ProcessRunner> Dispatcher<F, R> {
    /// Creates a dispatcher for an already detected profile.
    pub fn new(profile: EnvironmentProfile, settings: DispatcherSettings, fs: F, runner: R) -> Self {
        Self {
            profile,
            settings,
            fs,
            runner,
        }
    }

    /// The active profile, including any sticky bridge promotion.
    pub fn profile(&self) -> EnvironmentProfile {
        self.profile
    }

    /// Stages `request.script` for the active profile, runs it and, unless
    /// [`OpOption::Keep`] is set, deletes the staged file again.
    ///
    /// The child's exit code is returned in the report; a non-zero code is not an error here.
    ///
    /// # Errors
    /// - [`DispatchError::UnsupportedExecutionTarget`] before anything is staged when the profile
    ///   cannot run scripts.
    /// - [`DispatchError::Staging`] when the staging directory or file cannot be written.
    /// - [`DispatchError::Execution`] when the shell could not be started. The staged file is
    ///   still cleaned up.
    pub fn execute(&mut self, request: &ExecutionRequest) -> Result<ExecutionReport, DispatchError> {
        let _timer = BlockTimer::new("creating and executing file");

        let bridge = request.has(OpOption::WindowsFsBridge);
        if bridge && self.profile == EnvironmentProfile::LinuxUnderSubsystem {
            self.profile = self.profile.bridged();
            log::debug!("Promoted profile to {} for this process", self.profile);
        }

        let profile = self.profile;
        let prefix = profile
            .prefix_lines(&request.variables)
            .ok_or(DispatchError::UnsupportedExecutionTarget { profile })?;
        let conventions = profile.conventions();
        let lines = staging::assemble_lines(prefix, &request.script, &conventions);
        log::debug!("OS: {}", profile);

        let temp_root = if bridge {
            self.fs.jailed_root(&self.settings.windows_temp)
        } else {
            self.fs.temp_root()
        };
        let staging_dir = temp_root.join(&self.settings.staging_dir);
        self.fs
            .create_dir(&staging_dir)
            .map_err(|source| staging_error(&staging_dir, source))?;

        let staged_path =
            staging_dir.join(staging::staged_file_name(&request.script, &conventions));
        log::debug!("Staging script at '{}'", staged_path.display());
        self.fs
            .write_lines(&staged_path, &lines)
            .map_err(|source| staging_error(&staged_path, source))?;

        let style = if profile == EnvironmentProfile::SubsystemAccessingWindowsFS {
            PathStyle::WindowsFromSubsystem
        } else {
            PathStyle::Host
        };
        let native_path = self.fs.native_path(&staged_path, style);
        let command_line = build_command_line(
            profile,
            &conventions,
            &native_path,
            request.has(OpOption::Quiet),
        );

        let kept = request.has(OpOption::Keep);
        let outcome = {
            let fs = &self.fs;
            let _cleanup = scopeguard::guard(&staged_path, |path| {
                if !kept {
                    remove_staged(fs, path);
                }
            });
            self.runner.run(&command_line)?
        };

        Ok(ExecutionReport {
            profile,
            staged_path,
            command_line,
            outcome,
            kept,
        })
    }

    /// Opens an already parsed devfile in the profile's editor and waits for the editor to exit.
    pub fn edit(&self, devfile: &Devfile) -> Result<RunOutcome, DispatchError> {
        if self.profile.shell_family().is_none() {
            return Err(DispatchError::UnsupportedExecutionTarget {
                profile: self.profile,
            });
        }

        let conventions = self.profile.conventions();
        let path = self.fs.native_path(devfile.absolute_path(), PathStyle::Host);
        let command_line = build_editor_line(self.profile, &conventions, &path);
        Ok(self.runner.run(&command_line)?)
    }
}

fn staging_error(path: &Path, source: std::io::Error) -> DispatchError {
    DispatchError::Staging {
        path: path.display().to_string(),
        source,
    }
}

fn remove_staged(fs: &impl FileSystem, path: &Path) {
    match fs.delete(path) {
        Ok(()) => log::debug!("Removed staged script '{}'", path.display()),
        Err(e) => log::warn!("Could not remove staged script '{}': {}", path.display(), e),
    }
}

/// `<shell> <path>`, followed by the silence token in quiet mode.
fn build_command_line(
    profile: EnvironmentProfile,
    conventions: &Conventions,
    native_path: &str,
    quiet: bool,
) -> String {
    let mut parts = Vec::with_capacity(3);
    if !conventions.shell_command.is_empty() {
        parts.push(conventions.shell_command.to_string());
    }
    parts.push(quote_for_host(profile, native_path));
    if quiet && !conventions.silence_token.is_empty() {
        parts.push(conventions.silence_token.to_string());
    }
    parts.join(" ")
}

/// `<editor> <path>`. `start` takes its first quoted argument as a window title, so native
/// Windows always gets an empty title followed by the quoted path.
fn build_editor_line(profile: EnvironmentProfile, conventions: &Conventions, path: &str) -> String {
    let editor = conventions.editor_command.trim_end();
    if profile == EnvironmentProfile::Windows {
        format!("{} \"\" \"{}\"", editor, path)
    } else {
        format!("{} {}", editor, quote_for_host(profile, path))
    }
}

/// Quotes an argument for the shell that interprets the command line. Every profile except
/// native Windows is launched from `sh`, the bridged one included.
fn quote_for_host(profile: EnvironmentProfile, argument: &str) -> String {
    if profile == EnvironmentProfile::Windows {
        if argument.contains(char::is_whitespace) {
            format!("\"{}\"", argument)
        } else {
            argument.to_string()
        }
    } else {
        shlex::try_quote(argument)
            .map(|quoted| quoted.into_owned())
            .unwrap_or_else(|_| argument.to_string())
    }
}
