// EN: src/cli/handlers/profile.rs

//! `dev profile`: prints the detected environment profile and its conventions.

use anyhow::Result;
use clap::Parser;
use colored::*;

use super::commons::Session;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
struct ProfileArgs {}

/// The main handler for the `profile` command: shows the detected environment.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    ProfileArgs::try_parse_from(&args)?;

    let profile = session.dispatcher()?.profile();
    let conventions = profile.conventions();
    let suffix = conventions
        .suffix_lines
        .iter()
        .map(|line| format!("{:?}", line))
        .collect::<Vec<_>>()
        .join(", ");

    println!("{} {}", "Profile:".bold(), profile.to_string().yellow().bold());
    println!("  {:<10} {}", "shell", conventions.shell_command);
    println!("  {:<10} {}", "extension", conventions.file_extension);
    println!("  {:<10} {}", "silence", conventions.silence_token);
    println!("  {:<10} {}", "editor", conventions.editor_command);
    println!("  {:<10} [{}]", "suffix", suffix);
    Ok(())
}
