//! # System Interaction Layer
//!
//! This module provides abstractions for interacting with the underlying operating system.
//! It serves as a boundary between the dispatcher and the specifics of process management
//! and the filesystem, so both can be replaced in tests.
//!
//! ## Modules
//!
//! - **`executor`**: Runs a command line through the host shell and reports its exit code.
//!   Blocks until the process has finished.
//! - **`fs`**: Directory creation, line-oriented writes, deletion, and the temp roots and
//!   native path strings the dispatcher hands to the shell.

pub mod executor;
pub mod fs;
