//! Pattern tables used by the gate.
//!
//! Two tables live here: the trigger table deciding whether a tool call
//! announces completion, and the output patterns used to pull diagnostics
//! out of tool output. Both are versioned together through
//! [`PATTERN_VERSION`]; bump it whenever a default phrase or regex changes.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Version of the built-in pattern tables.
pub const PATTERN_VERSION: u32 = 1;

/// Default completion phrases (matched as lower-case substrings).
pub const DEFAULT_PHRASES: &[&str] = &[
    "all done",
    "complete",
    "finished",
    "ready",
    "all set",
    "that's it",
    "task complete",
];

/// Default shell execution tool names.
pub const DEFAULT_TOOL_NAMES: &[&str] = &["Bash"];

// `<file>(<line>,<col>): error TS<code>: <message>`
static TSC_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<file>.+?)\((?P<line>\d+),(?P<col>\d+)\): error (?P<code>TS\d+): (?P<msg>.+)$")
        .unwrap()
});

// `<file>:<line>:<col> error <message>` (eslint compact-ish output)
static LINT_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<file>.+?):(?P<line>\d+):(?P<col>\d+):?\s+error\s+(?P<msg>.+)$").unwrap()
});

/// Trigger table: which tool calls count as completion announcements.
///
/// Matching is a plain case-insensitive substring test with no word
/// boundaries, so "completely rewritten" also triggers on "complete".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerTable {
    /// Tool names treated as shell execution (exact match).
    #[serde(default = "default_tool_names")]
    pub tool_names: Vec<String>,

    /// Completion phrases.
    #[serde(default = "default_phrases")]
    pub phrases: Vec<String>,

    /// When non-empty, the command must also contain one of these words
    /// (e.g. `echo`, `print`) to count as an announcement.
    #[serde(default)]
    pub announce_words: Vec<String>,
}

fn default_tool_names() -> Vec<String> {
    DEFAULT_TOOL_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_phrases() -> Vec<String> {
    DEFAULT_PHRASES.iter().map(|s| s.to_string()).collect()
}

impl Default for TriggerTable {
    fn default() -> Self {
        Self {
            tool_names: default_tool_names(),
            phrases: default_phrases(),
            announce_words: Vec::new(),
        }
    }
}

impl TriggerTable {
    /// Check whether a tool call is a completion announcement.
    pub fn matches(&self, tool_name: &str, command: &str) -> bool {
        if !self.tool_names.iter().any(|t| t == tool_name) {
            return false;
        }

        let command = command.to_lowercase();
        if !self.announce_words.is_empty()
            && !self
                .announce_words
                .iter()
                .any(|w| command.contains(&w.to_lowercase()))
        {
            return false;
        }

        self.matched_phrase(&command).is_some()
    }

    /// First phrase contained in the (already lower-cased) command.
    pub fn matched_phrase(&self, lowered_command: &str) -> Option<&str> {
        self.phrases
            .iter()
            .map(String::as_str)
            .find(|p| !p.is_empty() && lowered_command.contains(&p.to_lowercase()))
    }
}

/// A diagnostic pulled out of one line of tool output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Parse a TypeScript compiler error line.
///
/// The message keeps the `TSxxxx` code as a prefix.
pub fn parse_tsc_line(line: &str) -> Option<Diagnostic> {
    let caps = TSC_ERROR.captures(line.trim_end())?;
    Some(Diagnostic {
        file: caps["file"].trim().to_string(),
        line: caps["line"].parse().ok()?,
        column: caps["col"].parse().ok()?,
        message: format!("{}: {}", &caps["code"], caps["msg"].trim()),
    })
}

/// Parse a linter error line.
pub fn parse_lint_line(line: &str) -> Option<Diagnostic> {
    let caps = LINT_ERROR.captures(line.trim_end())?;
    Some(Diagnostic {
        file: caps["file"].trim().to_string(),
        line: caps["line"].parse().ok()?,
        column: caps["col"].parse().ok()?,
        message: caps["msg"].trim().to_string(),
    })
}
