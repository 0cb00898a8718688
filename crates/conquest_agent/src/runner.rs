//! Blocking JSON-lines session.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{info, warn};

use crate::agent::Agent;
use crate::protocol::{Envelope, Move};

/// Error type for the session loop.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Reading a request or writing a move failed.
    #[error("Protocol I/O failed: {0}")]
    Io(#[from] io::Error),
    /// A move could not be serialized.
    #[error("Failed to encode move: {0}")]
    Json(#[from] serde_json::Error),
}

/// Drives an [`Agent`] over a line-oriented reader and writer.
#[derive(Debug, Default)]
pub struct AgentRunner {
    agent: Agent,
}

impl AgentRunner {
    /// Create a runner around `agent`.
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// The agent being driven.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Answer every request on `input` until end of stream.
    ///
    /// Writes the ready line first. A line that does not parse is answered
    /// with an error move and the session continues. Returns the number of
    /// requests answered.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<u64, RunnerError> {
        write_move(&mut output, &Move::ready())?;

        let mut answered = 0;
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let answer = match Envelope::from_json(line) {
                Ok(envelope) => self.agent.handle(&envelope),
                Err(e) => {
                    warn!(error = %e, "Unparseable request");
                    Move::error(format!("Parse error: {}", e))
                }
            };
            write_move(&mut output, &answer)?;
            answered += 1;
        }

        info!(answered, "Input closed, ending session");
        Ok(answered)
    }

    /// Run the session on the process stdin and stdout.
    pub fn run_stdio(&mut self) -> Result<u64, RunnerError> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run(stdin.lock(), stdout.lock())
    }
}

fn write_move<W: Write>(output: &mut W, answer: &Move) -> Result<(), RunnerError> {
    serde_json::to_writer(&mut *output, answer)?;
    output.write_all(b"\n")?;
    output.flush()?;
    Ok(())
}
