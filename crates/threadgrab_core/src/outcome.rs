use std::fmt;

/// Terminal result of one attachment download. Exactly one is produced per
/// descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub file_name: String,
    /// Bytes written on success, error text on failure.
    pub result: Result<u64, String>,
}

impl DownloadOutcome {
    pub fn succeeded(file_name: impl Into<String>, bytes_written: u64) -> Self {
        Self {
            file_name: file_name.into(),
            result: Ok(bytes_written),
        }
    }

    pub fn failed(file_name: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            file_name: file_name.into(),
            result: Err(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for DownloadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(_) => write!(f, "{} has been downloaded", self.file_name),
            Err(message) => write!(f, "{}: {}", self.file_name, message),
        }
    }
}

/// Tally of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        self.total += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}
