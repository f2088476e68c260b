// EN: src/cli/handlers/mod.rs

//! The logic for each CLI action.

pub mod commons;
pub mod edit;
pub mod exec;
pub mod init;
pub mod list;
pub mod profile;
pub mod run;
