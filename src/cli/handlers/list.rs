// EN: src/cli/handlers/list.rs

//! `dev list`: prints the operations of the governing devfile.

use anyhow::Result;
use clap::Parser;
use colored::*;

use super::commons::Session;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
struct ListArgs {}

/// The main handler for the `list` command.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    ListArgs::try_parse_from(&args)?;

    let devfile = session.load_devfile()?;
    println!("{}", devfile.absolute_path().display().to_string().dimmed());

    if devfile.operations().is_empty() {
        println!("{}", "No operations defined.".yellow());
        return Ok(());
    }

    let width = devfile
        .operations()
        .keys()
        .map(|name| name.len())
        .max()
        .unwrap_or(0);
    for (name, operation) in devfile.operations() {
        let options: Vec<String> = operation.options.iter().map(|o| o.to_string()).collect();
        let tags = if options.is_empty() {
            String::new()
        } else {
            format!(" [{}]", options.join(", "))
        };
        println!(
            "  {:<width$}  {}{}",
            name.cyan().bold(),
            operation.description.as_deref().unwrap_or(""),
            tags.dimmed(),
            width = width
        );
    }
    Ok(())
}
