//! Propgraph shell
//!
//! Reads commands from stdin, one per line, and writes one JSON response per
//! command to stdout. Logs go to stderr.

use anyhow::Context;
use clap::Parser;
use propgraph::{GraphStore, OutputFormat, Session, ShellConfig};
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "propgraph", version, about = "In-memory property graph shell")]
struct Cli {
    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Indent JSON responses
    #[arg(long)]
    pretty: bool,

    /// Maximum log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Line that ends the session
    #[arg(long)]
    terminator: Option<String>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ShellConfig> {
        let mut config = match &self.config {
            Some(path) => ShellConfig::from_yaml_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ShellConfig::default(),
        };

        if self.pretty {
            config.output = OutputFormat::Pretty;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(terminator) = self.terminator {
            config.terminator = terminator;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(config.level()?)
        .init();

    info!(version = propgraph::version(), "propgraph shell starting");

    let mut store = GraphStore::new();
    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = Session::new(&mut store, config)
        .run(stdin.lock(), stdout.lock())
        .context("session I/O failed")?;

    info!(
        commands = summary.commands,
        errors = summary.errors,
        "propgraph shell stopped"
    );
    Ok(())
}
