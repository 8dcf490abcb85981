//! Command dispatch
//!
//! Every command writes its result to a caller supplied writer so the
//! dispatch can be exercised without a terminal.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use clap::CommandFactory;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::application::{load_tree, ApplicationError, Payload, TreeService};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, OutputFormat, Settings};
use crate::domain::Node;

/// Load settings, apply CLI overrides and run the selected command on stdout.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let cwd = std::env::current_dir().ok();
    let mut settings = Settings::load(cwd.as_deref())?;
    if let Some(format) = cli.format {
        settings.format = format;
    }
    debug!("settings: {:?}", settings);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli.command.as_ref(), &settings, &mut out)
}

/// Run one command against `out`.
pub fn run<W: Write>(command: Option<&Commands>, settings: &Settings, out: &mut W) -> CliResult<()> {
    let service = TreeService::new();
    match command {
        Some(Commands::Traverse { file }) => traverse(&service, file, settings, out),
        Some(Commands::Flatten { file }) => flatten(&service, file, settings, out),
        Some(Commands::Search { file, id }) => search(&service, file, id, settings, out),
        Some(Commands::Depth { file, id }) => depth(&service, file, id, settings, out),
        Some(Commands::Leaves { file }) => leaves(file, settings, out),
        Some(Commands::Info { file }) => info(file, settings, out),
        Some(Commands::Config { command }) => config(command, settings, out),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, out);
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `treewalk --help`".into(),
        )),
    }
}

#[instrument(skip(service, settings, out))]
fn traverse<W: Write>(
    service: &TreeService,
    file: &Path,
    settings: &Settings,
    out: &mut W,
) -> CliResult<()> {
    let tree = load_tree(file)?;
    // Pre-order guarantees a parent's depth is known before its children
    let mut depths: HashMap<&str, usize> = HashMap::new();
    let mut visited = Vec::new();
    service.traverse(&tree, |node| {
        let level = depths.get(node.id.as_str()).copied().unwrap_or(0);
        for child in &node.children {
            depths.insert(child.id.as_str(), level + 1);
        }
        visited.push((level, node.id.as_str()));
    });

    match settings.format {
        OutputFormat::Plain => {
            for (level, id) in visited {
                let pad = " ".repeat(level * settings.indent);
                line(out, format_args!("{}{}", pad, id))?;
            }
            Ok(())
        }
        OutputFormat::Json => {
            let ids: Vec<_> = visited.into_iter().map(|(_, id)| id).collect();
            write_json(out, &ids, settings)
        }
    }
}

#[instrument(skip(service, settings, out))]
fn flatten<W: Write>(
    service: &TreeService,
    file: &Path,
    settings: &Settings,
    out: &mut W,
) -> CliResult<()> {
    let tree = load_tree(file)?;
    let flat = service.flatten(&tree);
    match settings.format {
        OutputFormat::Plain => {
            for node in &flat {
                line(out, format_args!("{}", node.id))?;
            }
            Ok(())
        }
        OutputFormat::Json => write_json(out, &flat, settings),
    }
}

#[instrument(skip(service, settings, out))]
fn search<W: Write>(
    service: &TreeService,
    file: &Path,
    id: &str,
    settings: &Settings,
    out: &mut W,
) -> CliResult<()> {
    let tree = load_tree(file)?;
    let found = service
        .search_by_id(&tree, id)
        .ok_or_else(|| ApplicationError::NodeNotFound(id.to_string()))?;

    match settings.format {
        OutputFormat::Plain => {
            let mut chain = vec![found.id.as_str()];
            chain.extend(found.path_ids());
            line(out, format_args!("{}", chain.join(&settings.separator)))
        }
        OutputFormat::Json => {
            let value = json!({
                "node": found.node,
                "path_to_root": found.path_ids(),
            });
            write_json(out, &value, settings)
        }
    }
}

#[instrument(skip(service, settings, out))]
fn depth<W: Write>(
    service: &TreeService,
    file: &Path,
    id: &str,
    settings: &Settings,
    out: &mut W,
) -> CliResult<()> {
    let tree = load_tree(file)?;
    let probe: Node<Payload> = Node::new(id, Payload::new());
    let depth = service.get_node_depth(&tree, &probe);
    match settings.format {
        OutputFormat::Plain => line(out, format_args!("{}", depth)),
        OutputFormat::Json => write_json(out, &json!({ "id": id, "depth": depth }), settings),
    }
}

#[instrument(skip(settings, out))]
fn leaves<W: Write>(file: &Path, settings: &Settings, out: &mut W) -> CliResult<()> {
    let tree = load_tree(file)?;
    let leaves = tree.leaves();
    match settings.format {
        OutputFormat::Plain => {
            for id in leaves {
                line(out, format_args!("{}", id))?;
            }
            Ok(())
        }
        OutputFormat::Json => write_json(out, &leaves, settings),
    }
}

#[instrument(skip(settings, out))]
fn info<W: Write>(file: &Path, settings: &Settings, out: &mut W) -> CliResult<()> {
    let tree = load_tree(file)?;
    let (nodes, height, leaves) = (tree.len(), tree.height(), tree.leaves().len());
    match settings.format {
        OutputFormat::Plain => {
            line(out, format_args!("root: {}", tree.id))?;
            line(out, format_args!("nodes: {}", nodes))?;
            line(out, format_args!("height: {}", height))?;
            line(out, format_args!("leaves: {}", leaves))
        }
        OutputFormat::Json => write_json(
            out,
            &json!({ "root": tree.id, "nodes": nodes, "height": height, "leaves": leaves }),
            settings,
        ),
    }
}

fn config<W: Write>(command: &ConfigCommands, settings: &Settings, out: &mut W) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let rendered = settings.to_toml()?;
            write!(out, "{}", rendered).map_err(write_err)
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => line(out, format_args!("{}", path.display())),
            None => Err(CliError::Usage(
                "no home directory, global config unavailable".into(),
            )),
        },
    }
}

fn line<W: Write>(out: &mut W, args: std::fmt::Arguments<'_>) -> CliResult<()> {
    writeln!(out, "{}", args).map_err(write_err)
}

fn write_json<W: Write, S: Serialize + ?Sized>(
    out: &mut W,
    value: &S,
    settings: &Settings,
) -> CliResult<()> {
    let rendered = if settings.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    line(out, format_args!("{}", rendered))
}

fn write_err(e: std::io::Error) -> CliError {
    ApplicationError::Io {
        context: "write output".into(),
        source: e,
    }
    .into()
}
