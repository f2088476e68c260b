//! # devfile
//!
//! Stages shell scripts as temporary files and runs them through the native shell of the host,
//! whether that is Linux, Windows, WSL, or WSL reaching into the Windows filesystem.

pub mod cli;
pub mod constants;
pub mod core;
pub mod dev_utils;
pub mod models;
pub mod system;
