//! Append-only decision log.
//!
//! One JSON record per line. The file is only ever appended to; once it
//! reaches `max_bytes` it is renamed to `<name>.1` (dropping any older
//! rotation) and a fresh file is started.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::LogConfig;
use crate::error::Error;
use crate::gate::{Evaluation, Invocation, Issue};
use crate::patterns::PATTERN_VERSION;

/// One logged gate outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecisionRecord {
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub tool_name: String,
    pub blocked: bool,
    pub issue_count: usize,
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Trigger and output pattern tables in force when the call was judged.
    #[serde(default)]
    pub pattern_version: u32,
}

impl DecisionRecord {
    pub fn from_evaluation(invocation: &Invocation, evaluation: &Evaluation) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            tool_name: invocation.tool_name.clone(),
            blocked: evaluation.decision.is_block(),
            issue_count: evaluation.issues.len(),
            issues: evaluation.issues.clone(),
            pattern_version: PATTERN_VERSION,
        }
    }
}

/// Size-rotated JSONL log.
#[derive(Debug, Clone)]
pub struct DecisionLog {
    path: PathBuf,
    max_bytes: u64,
}

impl DecisionLog {
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            path: path.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &LogConfig, project_root: &Path) -> Self {
        Self::new(config.resolved_path(project_root), config.max_bytes)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the rotated file.
    pub fn rotated_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".1");
        self.path.with_file_name(name)
    }

    /// Append a record, rotating first if the file is full.
    pub fn append(&self, record: &DecisionRecord) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        self.rotate_if_full()?;

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;

        debug!(path = %self.path.display(), blocked = record.blocked, "Logged decision");
        Ok(())
    }

    fn rotate_if_full(&self) -> Result<(), Error> {
        let size = match fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(()),
        };
        if size < self.max_bytes {
            return Ok(());
        }

        let rotated = self.rotated_path();
        fs::rename(&self.path, &rotated)?;
        info!(path = %rotated.display(), size, "Rotated decision log");
        Ok(())
    }

    /// The most recent `n` records of the current file, oldest first.
    ///
    /// Unparseable lines are skipped.
    pub fn tail(&self, n: usize) -> Result<Vec<DecisionRecord>, Error> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&self.path)?);
        let mut records = std::collections::VecDeque::with_capacity(n);

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<DecisionRecord>(&line) {
                Ok(record) => {
                    if records.len() == n {
                        records.pop_front();
                    }
                    if n > 0 {
                        records.push_back(record);
                    }
                }
                Err(e) => warn!(error = %e, "Skipping malformed log line"),
            }
        }

        Ok(records.into_iter().collect())
    }
}
