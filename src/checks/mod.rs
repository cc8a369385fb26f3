//! Checkers run by the completion gate.
//!
//! Each checker inspects one quality signal and returns the issues it
//! found. Failing to run (tool missing, timeout, IO trouble) is an `Err`,
//! which the gate turns into "no issues from this checker".

pub mod compose;
pub mod git;
pub mod lint;
pub mod python;
pub mod runner;
pub mod typescript;

#[cfg(test)]
pub(crate) mod testing;

use std::any::Any;
use std::path::Path;

use thiserror::Error;

use crate::config::{CheckKind, ChecksConfig};
use crate::gate::Issue;

pub use compose::ComposeChecker;
pub use git::GitStatusChecker;
pub use lint::LintChecker;
pub use python::PythonSyntaxChecker;
pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use typescript::TypeScriptChecker;

/// Why a checker produced no result.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("{program} is not available: {source}")]
    ToolUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("empty command")]
    EmptyCommand,

    #[error("checker panicked: {0}")]
    Panicked(String),
}

impl CheckError {
    /// Convert a `catch_unwind` payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        CheckError::Panicked(msg)
    }
}

/// What a checker sees of the world.
pub struct CheckContext<'a> {
    /// Working tree root.
    pub root: &'a Path,
    /// Process runner for external tools.
    pub runner: &'a dyn CommandRunner,
}

/// A single quality check.
pub trait Checker {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Run the check against the working tree.
    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, CheckError>;
}

/// Build the enabled checkers in configured order.
///
/// A kind listed twice runs once, at its first position.
pub fn battery(config: &ChecksConfig) -> Vec<Box<dyn Checker>> {
    let mut seen = Vec::new();
    let mut checkers: Vec<Box<dyn Checker>> = Vec::new();

    for kind in &config.order {
        if seen.contains(kind) {
            continue;
        }
        seen.push(*kind);

        match kind {
            CheckKind::Typescript if config.typescript.enabled => {
                checkers.push(Box::new(TypeScriptChecker::new(config.typescript.clone())));
            }
            CheckKind::Python if config.python.enabled => {
                checkers.push(Box::new(PythonSyntaxChecker::new(config.python.clone())));
            }
            CheckKind::Lint if config.lint.enabled => {
                checkers.push(Box::new(LintChecker::new(config.lint.clone())));
            }
            CheckKind::Compose if config.compose.enabled => {
                checkers.push(Box::new(ComposeChecker::new(config.compose.clone())));
            }
            CheckKind::Git if config.git.enabled => {
                checkers.push(Box::new(GitStatusChecker::new(config.git.clone())));
            }
            _ => {}
        }
    }

    checkers
}

/// True if any of `names` exists directly under `root`.
pub(crate) fn has_any(root: &Path, names: &[&str]) -> bool {
    names.iter().any(|name| root.join(name).exists())
}

/// First non-empty trimmed line of `text`.
pub(crate) fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}
