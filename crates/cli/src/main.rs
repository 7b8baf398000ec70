//! `ordo` CLI entry-point.
//!
//! Available sub-commands:
//! - `dump`     — print every task with its relationships and dependencies.
//! - `show`     — print a single task by qualified name.
//! - `entry`    — print the entry-point task.
//! - `validate` — report references that did not resolve.

mod load;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use engine::{GraphConfig, GraphError, TaskGraph, DEFAULT_ENTRY_KEY};

#[derive(Parser)]
#[command(
    name = "ordo",
    about = "Build and inspect task dependency graphs",
    version
)]
struct Cli {
    /// Key that marks the entry-point task.
    #[arg(long, global = true, env = "ORDO_ENTRY_KEY", default_value = DEFAULT_ENTRY_KEY)]
    entry_key: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the full task graph.
    Dump {
        /// Path to the configuration file (JSON or YAML).
        path: PathBuf,
    },
    /// Print one task by its qualified name.
    Show {
        path: PathBuf,
        /// Dot-joined task name, e.g. `backtest.rebalancing`.
        name: String,
    },
    /// Print the entry-point task.
    Entry { path: PathBuf },
    /// Build the graph and list unresolved references.
    Validate {
        path: PathBuf,
        /// Exit with failure if any reference is unresolved.
        #[arg(long, env = "ORDO_STRICT")]
        strict: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GraphConfig {
        entry_key: cli.entry_key,
    };

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &GraphConfig) -> Result<ExitCode> {
    match command {
        Command::Dump { path } => {
            let graph = build(&path, config)?;
            println!("{graph}");
            match graph.entry_point_id() {
                Some(id) => println!("\nEntry point: {}", graph.describe(id)),
                None => println!("\nEntry point: none"),
            }
        }
        Command::Show { path, name } => {
            let graph = build(&path, config)?;
            let id = graph.id(&name).ok_or(GraphError::NotFound(name))?;
            println!("{}", graph.describe(id));
        }
        Command::Entry { path } => {
            let graph = build(&path, config)?;
            match graph.entry_point_id() {
                Some(id) => println!("{}", graph.describe(id)),
                None => {
                    eprintln!("no task is keyed '{}'", config.entry_key);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Validate { path, strict } => {
            let graph = build(&path, config)?;
            let unresolved = graph.unresolved();
            if unresolved.is_empty() {
                println!("All references resolved ({} tasks).", graph.len());
                return Ok(ExitCode::SUCCESS);
            }

            println!("{} unresolved reference(s):", unresolved.len());
            for u in unresolved {
                println!("  {}: {} '{}'", u.task, u.kind.label(), u.identifier);
            }
            if strict {
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn build(path: &Path, config: &GraphConfig) -> Result<TaskGraph> {
    info!("Loading task configuration from {}", path.display());
    let document = load::load_document(path)?;
    let graph = TaskGraph::from_value_with(&document, config)
        .with_context(|| format!("cannot build task graph from {}", path.display()))?;
    Ok(graph)
}
