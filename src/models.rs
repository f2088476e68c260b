// src/models.rs

//! Data types shared by the dispatcher and the CLI.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use crate::core::profile::EnvironmentProfile;

/// Flags that change how a single script is staged and run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum OpOption {
    /// Append the profile's silence token to the command line.
    Quiet,
    /// Leave the staged file on disk after the run.
    Keep,
    /// From WSL, stage into the Windows temp folder and run through `cmd.exe`.
    #[serde(rename = "windows-fs")]
    WindowsFsBridge,
}

impl fmt::Display for OpOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Quiet => "quiet",
            Self::Keep => "keep",
            Self::WindowsFsBridge => "windows-fs",
        };
        f.write_str(name)
    }
}

/// One script to run, with its options and the variables injected into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Raw, possibly multi-line script text.
    pub script: String,
    /// Behavior flags for this run.
    pub options: BTreeSet<OpOption>,
    /// Variable name to value. Each entry becomes a `DEV_<NAME>` assignment.
    pub variables: BTreeMap<String, String>,
}

impl ExecutionRequest {
    /// Creates a request with no options and no variables.
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Adds an option.
    pub fn with_option(mut self, option: OpOption) -> Self {
        self.options.insert(option);
        self
    }

    /// Adds or replaces a variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Returns whether `option` was requested.
    pub fn has(&self, option: OpOption) -> bool {
        self.options.contains(&option)
    }
}

/// Exit information of a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl RunOutcome {
    /// Returns whether the process exited with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// What a call to `Dispatcher::execute` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// The profile the script ran under, after any bridge promotion.
    pub profile: EnvironmentProfile,
    /// Where the script was written.
    pub staged_path: PathBuf,
    /// The exact command line handed to the process runner.
    pub command_line: String,
    /// Exit information of the shell.
    pub outcome: RunOutcome,
    /// Whether the staged file was left on disk.
    pub kept: bool,
}
