//! .gitignore entries for donegate state.
//!
//! The state directory is always ignored. A decision log configured to live
//! elsewhere inside the project is ignored too, along with its rotated
//! generation; a log outside the project is none of git's business.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use crate::config::{LogConfig, STATE_DIR};
use crate::error::Error;
use crate::storage::DecisionLog;

/// Comment written above the first donegate entry.
const HEADER: &str = "# donegate";

/// Entries to ignore, rooted at the project in gitignore syntax.
pub fn ignore_entries(project_root: &Path, log: &LogConfig) -> Vec<String> {
    let mut entries = vec![format!("/{}/", STATE_DIR)];

    let log = DecisionLog::from_config(log, project_root);
    for path in [log.path().to_path_buf(), log.rotated_path()] {
        let Ok(rel) = path.strip_prefix(project_root) else {
            continue;
        };
        if rel.starts_with(STATE_DIR) {
            continue;
        }
        entries.push(format!("/{}", rel.to_string_lossy().replace('\\', "/")));
    }
    entries
}

/// Append the entries the file does not already ignore.
///
/// Returns the entries that were added; an empty list leaves the file
/// untouched.
pub fn ensure_ignored(path: &Path, entries: &[String]) -> Result<Vec<String>, Error> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    let present: HashSet<&str> = content.lines().map(normalize).collect();
    let missing: Vec<String> = entries
        .iter()
        .filter(|e| !present.contains(normalize(e)))
        .cloned()
        .collect();
    if missing.is_empty() {
        return Ok(missing);
    }

    let mut out = content.trim_end().to_string();
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    if !content.lines().any(|l| l.trim() == HEADER) {
        out.push_str(HEADER);
        out.push('\n');
    }
    for entry in &missing {
        out.push_str(entry);
        out.push('\n');
    }

    fs::write(path, out)?;
    Ok(missing)
}

/// `/.donegate/`, `.donegate/` and `.donegate` all name the same directory.
fn normalize(line: &str) -> &str {
    line.trim().trim_start_matches('/').trim_end_matches('/')
}
