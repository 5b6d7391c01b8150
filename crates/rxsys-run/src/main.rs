//! rxsys-run - simulates a reaction system from the command line.
//!
//! Takes the three input strings (reactions, environment, context) either
//! inline or from files, runs the simulation to completion and writes the
//! resulting transition graph as DOT or JSON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rxsys-run")]
#[command(about = "Simulate a reaction system and emit its transition graph")]
struct Cli {
    /// Reaction triples, e.g. "([a],[b],[c]), ([c],[a],[b])"
    #[arg(long, conflicts_with = "reactions_file")]
    reactions: Option<String>,

    /// Read the reaction triples from a file instead
    #[arg(long)]
    reactions_file: Option<PathBuf>,

    /// Environment bindings, e.g. "x = {a}.x" (may be empty)
    #[arg(long, conflicts_with = "environment_file")]
    environment: Option<String>,

    /// Read the environment bindings from a file instead
    #[arg(long)]
    environment_file: Option<PathBuf>,

    /// Context process(es) driving the run, e.g. "{a}.x + {b}.nil"
    #[arg(long, conflicts_with = "context_file")]
    context: Option<String>,

    /// Read the context from a file instead
    #[arg(long)]
    context_file: Option<PathBuf>,

    /// Where to write the graph
    #[arg(long, default_value = "result.dot")]
    output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Dot)]
    format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Dot,
    Json,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rxsys_run=info,rxsys_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let reactions = require(
        resolve(cli.reactions, cli.reactions_file.as_deref()),
        "reactions",
    );
    let environment = resolve(cli.environment, cli.environment_file.as_deref())
        .unwrap_or_else(|e| {
            error!("Failed to read environment input: {}", e);
            exit(1);
        })
        .unwrap_or_default();
    let context = require(resolve(cli.context, cli.context_file.as_deref()), "context");

    let outcome = match rxsys_engine::compute(&reactions, &environment, &context) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Simulation failed: {}", e);
            exit(1);
        }
    };
    info!(elapsed = ?outcome.elapsed, "simulation finished");

    let rendered = match cli.format {
        Format::Dot => outcome.graph.to_dot(),
        Format::Json => match outcome.graph.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize graph: {}", e);
                exit(1);
            }
        },
    };

    // Not being able to write the file shouldn't discard the run.
    match fs::write(&cli.output, rendered) {
        Ok(()) => info!("Graph written to: {}", cli.output.display()),
        Err(e) => warn!("Failed to write {}: {}", cli.output.display(), e),
    }
}

/// Prefer the inline string; fall back to reading the file.
fn resolve(inline: Option<String>, file: Option<&Path>) -> io::Result<Option<String>> {
    match (inline, file) {
        (Some(s), _) => Ok(Some(s)),
        (None, Some(path)) => fs::read_to_string(path).map(|s| Some(s.trim().to_string())),
        (None, None) => Ok(None),
    }
}

fn require(input: io::Result<Option<String>>, what: &str) -> String {
    match input {
        Ok(Some(s)) => s,
        Ok(None) => {
            error!("No {} given: pass --{} or --{}-file", what, what, what);
            exit(1);
        }
        Err(e) => {
            error!("Failed to read {} input: {}", what, e);
            exit(1);
        }
    }
}
