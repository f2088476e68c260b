// EN: src/cli/handlers/edit.rs

//! `dev edit`: opens the governing devfile in the profile's editor.

use anyhow::Result;
use clap::Parser;
use colored::*;

use super::commons::Session;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
struct EditArgs {}

/// The main handler for the `edit` command.
pub fn handle(args: Vec<String>, session: &mut Session) -> Result<()> {
    EditArgs::try_parse_from(&args)?;

    // The devfile must parse before it is handed to the editor.
    let devfile = session.load_devfile()?;
    println!(
        "\n> {}",
        format!("Editing {}", devfile.absolute_path().display()).green()
    );

    let outcome = session.dispatcher()?.edit(&devfile)?;
    if !outcome.success() {
        log::warn!("Editor exited with code: {:?}", outcome.code);
    }
    Ok(())
}
