// EN: src/bin/dev.rs

//! The `dev` command-line entry point.

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use devfile::{
    cli::{
        Cli,
        handlers::{
            self,
            commons::{ScriptFailed, Session},
        },
    },
    core::{config, dispatcher::DispatchError},
};

// --- Command Definition and Registry ---

/// Defines a system command, its aliases, and its synchronous handler function.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &mut Session) -> Result<()>,
}

/// The single source of truth for all system commands.
/// Any first argument that is not listed here is treated as an operation name.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "edit",
        aliases: &[],
        handler: handlers::edit::handle,
    },
    CommandDefinition {
        name: "exec",
        aliases: &[],
        handler: handlers::exec::handle,
    },
    CommandDefinition {
        name: "init",
        aliases: &["new"],
        handler: handlers::init::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "profile",
        aliases: &[],
        handler: handlers::profile::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        handler: handlers::run::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// The main entry point of the `dev` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // --- Centralized Error Handling ---
        // A failing script whose exit code must be propagated: it already reported itself.
        if let Some(failed) = e.downcast_ref::<ScriptFailed>() {
            std::process::exit(failed.code);
        }

        // Dispatch errors carry stable exit codes callers rely on.
        let code = e
            .downcast_ref::<DispatchError>()
            .map_or(1, DispatchError::exit_code);

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(code);
    }
}

/// The main application dispatcher.
///
/// Routes `dev <action> [args...]` to a registered handler and `dev <operation> [args...]`
/// to the `run` handler.
fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let config = config::load_config()?;
    let working_dir = std::env::current_dir().context("Could not read the working directory")?;
    let mut session = Session::new(config, working_dir);

    let first = match cli.action_or_operation {
        Some(first) => first,
        None => return handlers::list::handle(Vec::new(), &mut session),
    };

    if let Some(command) = find_command(&first) {
        (command.handler)(cli.args, &mut session)
    } else {
        let mut run_args = vec![first];
        run_args.extend(cli.args);
        handlers::run::handle(run_args, &mut session)
    }
}
