// src/core/profile.rs

//! # Environment Profiles
//!
//! An [`EnvironmentProfile`] names one supported host environment. Every profile resolves to a
//! set of [`Conventions`]: how a staged script must end, which interpreter runs it, how its
//! output is silenced, how the staged file is named and which editor opens files.
//!
//! The WSL profiles are not copies of their native counterparts. They are composed from the
//! two building blocks, [`linux_conventions`] and [`windows_conventions`], by [`profile_for`]
//! and [`EnvironmentProfile::conventions`]. The bridged profile runs Windows batch files from
//! inside WSL, so it needs the Windows file layout but the Linux-side redirection and editor.

use std::collections::BTreeMap;
use std::fmt;

/// Interpreter used by WSL to reach back into the host Windows shell.
pub const BRIDGE_SHELL_COMMAND: &str = "/mnt/c/Windows/System32/cmd.exe /c";

/// Namespace prepended to every injected variable name.
pub const VARIABLE_PREFIX: &str = "DEV_";

/// Enables aliases and loads the user's alias file before the script body.
const POSIX_BOOTSTRAP: &[&str] = &["shopt -s expand_aliases", "source ~/.bash_aliases"];

const CMD_BOOTSTRAP: &[&str] = &["@echo off"];

/// The host environments the dispatcher knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvironmentProfile {
    /// Native Linux.
    Linux,
    /// Native Windows.
    Windows,
    /// Linux running under the Windows Subsystem for Linux.
    LinuxUnderSubsystem,
    /// WSL executing batch files on the host Windows filesystem.
    SubsystemAccessingWindowsFS,
    /// Placeholder for hosts without a profile. Never executable.
    Unsupported,
}

/// The OS families detection distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsFamily {
    /// Any Linux kernel, including WSL.
    Linux,
    /// Native Windows.
    Windows,
    /// Everything else, carrying the name reported by the host.
    Other(String),
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

/// The script dialect a profile speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFamily {
    /// bash, run through `source`-compatible assignments.
    Posix,
    /// cmd.exe batch files.
    Cmd,
}

/// Execution conventions of one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conventions {
    /// Lines appended to every staged script.
    pub suffix_lines: Vec<&'static str>,
    /// Interpreter placed in front of the staged file path. May be empty.
    pub shell_command: &'static str,
    /// Redirection appended to the command line in quiet mode.
    pub silence_token: &'static str,
    /// Extension of the staged script file, including the leading dot.
    pub file_extension: &'static str,
    /// Command placed in front of a file path to edit it.
    pub editor_command: &'static str,
}

/// Conventions of a native Linux host running bash.
pub fn linux_conventions() -> Conventions {
    Conventions {
        suffix_lines: vec![""],
        shell_command: "/bin/bash",
        silence_token: "> /dev/null",
        file_extension: ".dev",
        editor_command: "\"${EDITOR:-vim}\" ",
    }
}

/// Conventions of a native Windows host running cmd.exe.
pub fn windows_conventions() -> Conventions {
    Conventions {
        suffix_lines: vec!["@echo on"],
        shell_command: "",
        silence_token: ">NUL",
        file_extension: ".dev.bat",
        editor_command: "start",
    }
}

fn unsupported_conventions() -> Conventions {
    Conventions {
        suffix_lines: vec![""],
        shell_command: "",
        silence_token: "",
        file_extension: "",
        editor_command: "",
    }
}

/// What detection learned about the host, before any per-call bridging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// Linux without the WSL kernel marker.
    Linux,
    /// Linux whose kernel carries the WSL marker.
    Subsystem,
    /// Native Windows.
    Windows,
    /// Anything detection has no profile for.
    Unknown,
}

/// Composes the profile for a host, optionally bridged into the Windows filesystem.
///
/// The bridge only exists from inside WSL; native hosts ignore `bridged`.
pub fn profile_for(host: HostKind, bridged: bool) -> EnvironmentProfile {
    match (host, bridged) {
        (HostKind::Linux, _) => EnvironmentProfile::Linux,
        (HostKind::Subsystem, false) => EnvironmentProfile::LinuxUnderSubsystem,
        (HostKind::Subsystem, true) => EnvironmentProfile::SubsystemAccessingWindowsFS,
        (HostKind::Windows, _) => EnvironmentProfile::Windows,
        (HostKind::Unknown, _) => EnvironmentProfile::Unsupported,
    }
}

impl EnvironmentProfile {
    /// Resolves the conventions of this profile.
    pub fn conventions(self) -> Conventions {
        match self {
            Self::Linux | Self::LinuxUnderSubsystem => linux_conventions(),
            Self::Windows => windows_conventions(),
            Self::SubsystemAccessingWindowsFS => {
                let linux = linux_conventions();
                let windows = windows_conventions();
                Conventions {
                    suffix_lines: windows.suffix_lines,
                    shell_command: BRIDGE_SHELL_COMMAND,
                    silence_token: linux.silence_token,
                    file_extension: windows.file_extension,
                    editor_command: linux.editor_command,
                }
            }
            Self::Unsupported => unsupported_conventions(),
        }
    }

    /// The script dialect, or `None` for [`EnvironmentProfile::Unsupported`].
    pub fn shell_family(self) -> Option<ShellFamily> {
        match self {
            Self::Linux | Self::LinuxUnderSubsystem => Some(ShellFamily::Posix),
            Self::Windows | Self::SubsystemAccessingWindowsFS => Some(ShellFamily::Cmd),
            Self::Unsupported => None,
        }
    }

    /// The profile to use when the Windows filesystem bridge is requested.
    /// Only WSL is promoted; every other profile stays as it is.
    pub fn bridged(self) -> Self {
        match self {
            Self::LinuxUnderSubsystem => profile_for(HostKind::Subsystem, true),
            other => other,
        }
    }

    /// Bootstrap lines placed before the script body, followed by one assignment per variable.
    /// Returns `None` when the profile cannot execute anything.
    pub fn prefix_lines(self, variables: &BTreeMap<String, String>) -> Option<Vec<String>> {
        let (bootstrap, assignment) = match self.shell_family()? {
            ShellFamily::Posix => (POSIX_BOOTSTRAP, ""),
            ShellFamily::Cmd => (CMD_BOOTSTRAP, "set "),
        };

        let mut lines: Vec<String> = bootstrap.iter().map(|line| line.to_string()).collect();
        lines.extend(variables.iter().map(|(name, value)| {
            format!(
                "{}{}{}={}",
                assignment,
                VARIABLE_PREFIX,
                name.to_uppercase(),
                value
            )
        }));
        Some(lines)
    }
}

impl fmt::Display for EnvironmentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::LinuxUnderSubsystem => "wsl-linux",
            Self::SubsystemAccessingWindowsFS => "wsl-windows",
            Self::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}
