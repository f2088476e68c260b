// src/constants.rs

//! Fixed names, paths and exit codes.

/// The name of the devfile searched for in the working directory and its parents.
pub const DEVFILE_NAME: &str = "devfile.toml";

/// The name of the directory holding devfile's user configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "devfile";

/// The name of the user configuration file (inside the config directory).
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that points to an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "DEVFILE_CONFIG";

/// The subdirectory of the temp root where scripts are staged.
pub const STAGING_DIR_NAME: &str = "devfiles";

/// The host Windows temp folder as seen from inside WSL.
pub const WINDOWS_TEMP_FROM_SUBSYSTEM: &str = "/mnt/c/Windows/Temp";

/// Marker in the kernel version string that identifies WSL.
pub const SUBSYSTEM_KERNEL_MARKER: &str = "WSL2";

/// Where the Linux kernel publishes its version string.
pub const KERNEL_VERSION_PATH: &str = "/proc/version";

/// Exit code for a host OS family without a profile.
pub const EXIT_UNSUPPORTED_ENVIRONMENT: i32 = 95;

/// Exit code for an attempt to execute on a profile that cannot run scripts.
pub const EXIT_UNSUPPORTED_EXECUTION_TARGET: i32 = 38;
