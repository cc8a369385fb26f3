//! Python syntax check.
//!
//! Compiles a handful of recently touched `.py` files one at a time.
//! Failures carry no line or column; the compiler message is enough to
//! find them.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::{CheckContext, CheckError, Checker, CommandSpec};
use crate::config::PythonConfig;
use crate::gate::{Category, Issue};

/// Directories never scanned.
const SKIP_DIRS: &[&str] = &["node_modules", "target", "venv", "__pycache__", "dist", "build"];

pub struct PythonSyntaxChecker {
    config: PythonConfig,
}

impl PythonSyntaxChecker {
    pub fn new(config: PythonConfig) -> Self {
        Self { config }
    }

    /// Candidate files in walk order, capped at `max_files`.
    pub fn candidates(&self, root: &Path) -> Vec<PathBuf> {
        let window = (self.config.recent_minutes > 0)
            .then(|| Duration::from_secs(self.config.recent_minutes * 60));
        let now = SystemTime::now();

        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("py"))
            .filter(|e| window.map_or(true, |w| modified_within(e, now, w)))
            .take(self.config.max_files)
            .map(|e| e.into_path())
            .collect()
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIP_DIRS.contains(&name.as_ref())
}

fn modified_within(entry: &DirEntry, now: SystemTime, window: Duration) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        // Timestamps in the future count as recent.
        .map(|mtime| now.duration_since(mtime).map_or(true, |age| age <= window))
        .unwrap_or(false)
}

impl Checker for PythonSyntaxChecker {
    fn name(&self) -> &'static str {
        "python"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, CheckError> {
        let files = self.candidates(ctx.root);
        debug!(count = files.len(), "Python files to compile");

        let base = CommandSpec::from_argv(&self.config.command)?;
        let mut issues = Vec::new();

        for file in files {
            let rel = file.strip_prefix(ctx.root).unwrap_or(&file).to_path_buf();
            let spec = base.clone().arg(rel.to_string_lossy());
            let output = match ctx.runner.run(&spec, ctx.root) {
                Ok(output) => output,
                // A missing interpreter fails every file alike.
                Err(e @ CheckError::ToolUnavailable { .. }) => return Err(e),
                Err(e) => {
                    warn!(file = %rel.display(), error = %e, "Could not compile file, skipping");
                    continue;
                }
            };

            if !output.success() {
                let combined = output.combined();
                let message = combined
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .last()
                    .unwrap_or("failed to compile");
                issues.push(Issue::new(
                    Category::Python,
                    rel.to_string_lossy(),
                    None,
                    None,
                    message,
                ));
            }
        }

        Ok(issues)
    }
}
