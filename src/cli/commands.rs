//! Command dispatch: one function per subcommand.

use std::io::{self, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::protocol::{self, Request, Response};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::shell::{self, resolve_target, Shell};
use crate::config::{global_config_path, SeedMode, Settings};
use crate::domain::{Node, StudySession, TreeDisplay};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        let settings = load_settings(cli)?;
        let container = ServiceContainer::new(settings)?;
        return _list(&container, false, false);
    };

    // Commands that don't need a tree
    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config { command } => return _config(cli, command),
        _ => {}
    }

    let settings = load_settings(cli)?;
    let container = ServiceContainer::new(settings)?;

    match command {
        Commands::List { json, ids } => _list(&container, *json, *ids),
        Commands::Add {
            target,
            file_type,
            name,
            output,
        } => _add(&container, target, file_type, name, output.as_deref()),
        Commands::Remove { id, output } => _remove(&container, id, output.as_deref()),
        Commands::Find { id } => _find(&container, id),
        Commands::Study { deck } => _study(&container, deck),
        Commands::Shell => _shell(&container),
        Commands::Serve => _serve(&container),
        Commands::Export { path } => _export(&container, path),
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}

/// Settings from file and environment, then the global flags on top.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(seed_file) = &cli.seed_file {
        settings.seed_file = Some(seed_file.clone());
    }
    if cli.empty {
        settings.seed = SeedMode::Empty;
        settings.seed_file = None;
    }
    debug!("effective settings: {:?}", settings);
    Ok(settings)
}

/// Turn a rejected response into a CLI error.
fn accepted(response: Response) -> CliResult<Response> {
    match response {
        Response::Error {
            code,
            message,
            field: Some(field),
        } => Err(CliError::Rejected {
            code,
            message: format!("{field}: {message}"),
        }),
        Response::Error { code, message, .. } => Err(CliError::Rejected { code, message }),
        ok => Ok(ok),
    }
}

#[instrument(skip(container))]
fn _list(container: &ServiceContainer, json: bool, ids: bool) -> CliResult<()> {
    let root = container.store.get_all();
    if json {
        let rendered = serde_json::to_string_pretty(&Node::Directory(root))
            .map_err(|e| CliError::Infra(InfraError::io("serialize tree", io::Error::other(e))))?;
        output::info(&rendered);
    } else {
        let ids = ids || container.settings.show_ids;
        print!("{}", root.to_tree_string(ids));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _add(
    container: &ServiceContainer,
    target: &str,
    file_type: &str,
    name: &str,
    out: Option<&Path>,
) -> CliResult<()> {
    let store = &container.store;
    let request = Request::Add {
        id: resolve_target(target, store),
        file_type: file_type.to_string(),
        name: name.to_string(),
    };
    if let Response::Ok { id: Some(id), .. } = accepted(protocol::dispatch(store, request))? {
        output::action("Added", &format!("{name} ({file_type}) {id}"));
    }
    print!("{}", store.get_all().to_tree_string(container.settings.show_ids));
    save_if_requested(container, out)
}

#[instrument(skip(container))]
fn _remove(container: &ServiceContainer, id: &str, out: Option<&Path>) -> CliResult<()> {
    let store = &container.store;
    let request = Request::Remove {
        id: resolve_target(id, store),
    };
    accepted(protocol::dispatch(store, request))?;
    output::action("Removed", id);
    print!("{}", store.get_all().to_tree_string(container.settings.show_ids));
    save_if_requested(container, out)
}

#[instrument(skip(container))]
fn _find(container: &ServiceContainer, id: &str) -> CliResult<()> {
    let store = &container.store;
    let request = Request::Find {
        id: resolve_target(id, store),
    };
    if let Response::Ok {
        node: Some(node),
        parent,
        ..
    } = accepted(protocol::dispatch(store, request))?
    {
        output::header(&format!("{} ({})", node.name(), node.file_type()));
        print!("{}", shell::describe(&node, true));
        match parent {
            Some(parent) => output::detail(&format!("parent: {parent}")),
            None => output::detail("parent: none (root)"),
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn _study(container: &ServiceContainer, deck: &str) -> CliResult<()> {
    let id = protocol::parse_id(deck)?;
    let deck = container.store.deck(id)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    shell::run_study(StudySession::new(deck), &mut input, &mut out)
        .map_err(|e| CliError::Infra(InfraError::io("study session", e)))
}

fn _shell(container: &ServiceContainer) -> CliResult<()> {
    let stdin = io::stdin();
    Shell::new(container, stdin.lock(), io::stdout()).run()
}

fn _serve(container: &ServiceContainer) -> CliResult<()> {
    debug!("serving JSON requests on stdin");
    let stdin = io::stdin();
    shell::serve(&container.store, stdin.lock(), io::stdout())
        .map_err(|e| CliError::Infra(InfraError::io("serve", e)))
}

#[instrument(skip(container))]
fn _export(container: &ServiceContainer, path: &Path) -> CliResult<()> {
    container.snapshots.save(path, &container.store.get_all())?;
    output::success(&format!("exported to {}", path.display()));
    Ok(())
}

fn save_if_requested(container: &ServiceContainer, out: Option<&Path>) -> CliResult<()> {
    if let Some(path) = out {
        container.snapshots.save(path, &container.store.get_all())?;
        output::action("Saved", &path.display());
    }
    Ok(())
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let marker = if path.exists() { "" } else { " (not present)" };
                output::info(&format!("{}{marker}", path.display()));
            }
            None => output::warning("cannot determine config directory"),
        },
    }
    io::stdout()
        .flush()
        .map_err(|e| CliError::Infra(InfraError::io("flush stdout", e)))
}
