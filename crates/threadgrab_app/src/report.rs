use std::io::{self, Write};
use std::sync::Mutex;

use engine_logging::engine_warn;
use threadgrab_core::DownloadOutcome;
use threadgrab_engine::OutcomeSink;

/// Prints one line per outcome, plus the header and footer lines of a run.
pub struct ConsoleReporter<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn line(&self, text: &str) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(err) = writeln!(out, "{text}").and_then(|_| out.flush()) {
            engine_warn!("failed to write report line: {}", err);
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> OutcomeSink for ConsoleReporter<W> {
    fn report(&self, outcome: &DownloadOutcome) {
        self.line(&outcome.to_string());
    }
}
