//! Step outputs (`status`, `listing-id`, `listing-url`).
//!
//! Inside CI the outputs are appended to the file named by `GITHUB_OUTPUT`;
//! elsewhere they are printed to stdout as `key=value` lines.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use uuid::Uuid;

use crate::pipeline::{RunOutcome, RunStatus};

pub trait OutputSink {
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Appends outputs to a workflow command file.
pub struct FileOutputSink {
    path: PathBuf,
}

impl FileOutputSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for FileOutputSink {
    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format_output(key, value).as_bytes())
    }
}

pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(format_output(key, value).as_bytes())
    }
}

/// The file sink when `GITHUB_OUTPUT` is set, stdout otherwise.
pub fn sink_from_env() -> Box<dyn OutputSink> {
    match env::var_os("GITHUB_OUTPUT").filter(|path| !path.is_empty()) {
        Some(path) => Box::new(FileOutputSink::new(path)),
        None => Box::new(StdoutSink),
    }
}

/// Multi-line values use the heredoc form with a random delimiter.
fn format_output(key: &str, value: &str) -> String {
    if value.contains('\n') || value.contains('\r') {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        format!("{key}<<{delimiter}\n{value}\n{delimiter}\n")
    } else {
        format!("{key}={value}\n")
    }
}

/// Writes the outputs of a successful run. `listing-id` and `listing-url`
/// are only set once a listing was created or updated.
pub fn write_outcome(sink: &mut dyn OutputSink, outcome: &RunOutcome) -> io::Result<()> {
    sink.set("status", outcome.status.as_str())?;
    if let Some(id) = &outcome.listing_id {
        sink.set("listing-id", id.as_str())?;
    }
    if let Some(url) = &outcome.listing_url {
        sink.set("listing-url", url)?;
    }
    Ok(())
}

pub fn write_failure(sink: &mut dyn OutputSink) -> io::Result<()> {
    sink.set("status", RunStatus::Error.as_str())
}
