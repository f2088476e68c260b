// EN: src/cli/handlers/init.rs

//! `dev init`: writes a starter devfile.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::*;
use std::fs;

use crate::core::devfile::Devfile;

use super::commons::Session;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
struct InitArgs {}

/// The main handler for the `init` command.
/// Writes a starter devfile into the working directory, never over an existing one.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    InitArgs::try_parse_from(&args)?;

    let path = session.working_dir().join(&session.config().devfile_name);
    if path.exists() {
        return Err(anyhow!("'{}' already exists.", path.display()));
    }

    fs::write(&path, Devfile::template())
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    println!(
        "{} {}",
        "Created".green(),
        path.display().to_string().yellow()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::UserConfig;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_template_once() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(UserConfig::default(), dir.path().to_path_buf());

        handle(Vec::new(), &mut session).unwrap();
        let devfile = session.load_devfile().unwrap();
        assert!(devfile.operation("hello").is_ok());

        let err = handle(Vec::new(), &mut session).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_init_rejects_arguments() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(UserConfig::default(), dir.path().to_path_buf());
        assert!(handle(vec!["extra".to_string()], &mut session).is_err());
        assert!(!dir.path().join("devfile.toml").exists());
    }
}
