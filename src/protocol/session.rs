//! Line-oriented read loop
//!
//! Reads one command per line, writes one response per command and stops at
//! the terminator line or end of input.

use crate::config::ShellConfig;
use crate::graph::GraphStore;
use crate::protocol::handler::CommandHandler;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tracing::info;

/// Counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Command lines answered
    pub commands: usize,
    /// Of those, lines answered with an error
    pub errors: usize,
}

pub struct Session<'a> {
    store: &'a mut GraphStore,
    handler: CommandHandler,
    config: ShellConfig,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a mut GraphStore, config: ShellConfig) -> Self {
        Self {
            store,
            handler: CommandHandler::new(),
            config,
        }
    }

    /// Run until the terminator line or end of input
    ///
    /// Command failures are written as responses; only I/O errors end the
    /// loop early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        info!(terminator = self.config.terminator.as_str(), "session started");

        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();

            if trimmed == self.config.terminator {
                break;
            }
            if trimmed.is_empty() && self.config.skip_blank_lines {
                continue;
            }

            let response = self.handler.handle_line(trimmed, self.store);
            summary.commands += 1;
            if response.is_error() {
                summary.errors += 1;
            }

            writeln!(output, "{}", response.render(self.config.output))?;
            output.flush()?;
        }

        let stats = self.store.statistics();
        let labels: Vec<&str> = self
            .store
            .entities()
            .label_index()
            .labels()
            .map(|label| label.as_str())
            .collect();
        info!(
            commands = summary.commands,
            errors = summary.errors,
            entities = stats.entity_count,
            relationships = stats.relationship_count,
            labels = ?labels,
            "session ended"
        );
        Ok(summary)
    }
}
