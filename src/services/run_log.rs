//! Durable append-only run log for the accrual batch
//!
//! Lines are written synchronously, outside any database transaction, so
//! the trail of decisions survives a rollback and can be read after a
//! failed run.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;

#[derive(Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one timestamped, human-readable line. Logging failures are
    /// traced and swallowed; the batch must not die because its diagnostic
    /// file is unwritable.
    pub fn append(&self, message: &str) {
        if let Err(e) = self.try_append(message) {
            tracing::warn!("accrual run log write failed ({}): {}", self.path.display(), e);
        }
    }

    fn try_append(&self, message: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{} | {}", Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"), message)
    }
}
