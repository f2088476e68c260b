// src/core/detection.rs

//! Works out which [`EnvironmentProfile`] the current host needs.
//!
//! Detection runs once per process. Its result is handed to the `Dispatcher`, which owns it
//! from then on.

use crate::constants::{KERNEL_VERSION_PATH, SUBSYSTEM_KERNEL_MARKER};
use crate::core::dispatcher::DispatchError;
use crate::core::profile::{EnvironmentProfile, HostKind, OsFamily, profile_for};
use std::fs;

/// The host facts detection depends on.
pub trait HostProbe {
    /// The OS family the binary is running on.
    fn os_family(&self) -> OsFamily;

    /// The kernel version string, if the host publishes one.
    fn kernel_version(&self) -> Option<String>;
}

/// Probes the machine the process is running on.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeHost;

impl HostProbe for NativeHost {
    fn os_family(&self) -> OsFamily {
        match std::env::consts::OS {
            "linux" => OsFamily::Linux,
            "windows" => OsFamily::Windows,
            other => OsFamily::Other(other.to_string()),
        }
    }

    fn kernel_version(&self) -> Option<String> {
        match fs::read_to_string(KERNEL_VERSION_PATH) {
            Ok(version) => Some(version),
            Err(e) => {
                log::debug!("Could not read '{}': {}", KERNEL_VERSION_PATH, e);
                None
            }
        }
    }
}

/// Classifies the host. The kernel version is only consulted on Linux.
pub fn detect_host(probe: &impl HostProbe) -> HostKind {
    match probe.os_family() {
        OsFamily::Linux => {
            let is_subsystem = probe
                .kernel_version()
                .is_some_and(|version| version.contains(SUBSYSTEM_KERNEL_MARKER));
            if is_subsystem {
                HostKind::Subsystem
            } else {
                HostKind::Linux
            }
        }
        OsFamily::Windows => HostKind::Windows,
        OsFamily::Other(_) => HostKind::Unknown,
    }
}

/// Resolves the active profile for the host.
///
/// # Errors
/// Returns [`DispatchError::UnsupportedEnvironment`] when the OS family has no profile. Callers
/// treat it as fatal.
pub fn detect_profile(probe: &impl HostProbe) -> Result<EnvironmentProfile, DispatchError> {
    let profile = profile_for(detect_host(probe), false);
    if profile == EnvironmentProfile::Unsupported {
        return Err(DispatchError::UnsupportedEnvironment {
            family: probe.os_family(),
        });
    }
    log::debug!("Detected environment profile: {}", profile);
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EXIT_UNSUPPORTED_ENVIRONMENT;
    use std::cell::Cell;

    struct FakeHost {
        family: OsFamily,
        kernel: Option<&'static str>,
        kernel_reads: Cell<usize>,
    }

    impl FakeHost {
        fn new(family: OsFamily, kernel: Option<&'static str>) -> Self {
            Self {
                family,
                kernel,
                kernel_reads: Cell::new(0),
            }
        }
    }

    impl HostProbe for FakeHost {
        fn os_family(&self) -> OsFamily {
            self.family.clone()
        }

        fn kernel_version(&self) -> Option<String> {
            self.kernel_reads.set(self.kernel_reads.get() + 1);
            self.kernel.map(str::to_string)
        }
    }

    #[test]
    fn test_detect_profile_table() {
        let cases = [
            (
                OsFamily::Linux,
                Some("Linux version 6.8.0-45-generic (buildd@lcy02-amd64-075) #45-Ubuntu SMP"),
                EnvironmentProfile::Linux,
            ),
            (
                OsFamily::Linux,
                Some("Linux version 5.15.153.1-microsoft-standard-WSL2 (root@941d701f84f1)"),
                EnvironmentProfile::LinuxUnderSubsystem,
            ),
            (OsFamily::Linux, None, EnvironmentProfile::Linux),
            (OsFamily::Windows, None, EnvironmentProfile::Windows),
        ];

        for (family, kernel, expected) in cases {
            let host = FakeHost::new(family, kernel);
            assert_eq!(detect_profile(&host).unwrap(), expected, "kernel: {:?}", kernel);
        }
    }

    #[test]
    fn test_windows_never_reads_kernel_version() {
        let host = FakeHost::new(OsFamily::Windows, Some("WSL2"));
        assert_eq!(detect_profile(&host).unwrap(), EnvironmentProfile::Windows);
        assert_eq!(host.kernel_reads.get(), 0);
    }

    #[test]
    fn test_unsupported_family_is_fatal() {
        let host = FakeHost::new(OsFamily::Other("macos".to_string()), None);
        let err = detect_profile(&host).unwrap_err();

        assert!(matches!(err, DispatchError::UnsupportedEnvironment { .. }));
        assert_eq!(err.exit_code(), EXIT_UNSUPPORTED_ENVIRONMENT);
        assert_eq!(
            err.to_string(),
            "macos is currently not supported by devfile"
        );
    }
}
