//! Completion gate.
//!
//! Decides whether a tool call announces completion and, if it does, runs
//! the checker battery against the working tree. The gate fails open: a
//! checker that errors or panics contributes no issues, so a broken tool
//! never blocks a finished task.

pub mod report;

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::checks::{self, CheckContext, CheckError, Checker, CommandRunner};
use crate::config::Config;
use crate::patterns::TriggerTable;

/// Default number of issues rendered in a block report.
pub const DEFAULT_MAX_REPORTED: usize = 5;

/// One tool call as seen by the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool_name: String,
    pub command: String,
}

impl Invocation {
    pub fn new(tool_name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            command: command.into(),
        }
    }
}

/// Issue category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[serde(rename = "typescript")]
    TypeScript,
    Python,
    Lint,
    Config,
    Other,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::TypeScript => write!(f, "TypeScript"),
            Category::Python => write!(f, "Python"),
            Category::Lint => write!(f, "Lint"),
            Category::Config => write!(f, "Config"),
            Category::Other => write!(f, "Other"),
        }
    }
}

/// A defect found by a checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IssueFields")]
pub struct Issue {
    file_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<u32>,
    message: String,
    category: Category,
}

impl Issue {
    /// Create an issue. A blank message is replaced with `"error"`.
    pub fn new(
        category: Category,
        file_path: impl Into<String>,
        line: Option<u32>,
        column: Option<u32>,
        message: impl AsRef<str>,
    ) -> Self {
        let message = message.as_ref().trim();
        Self {
            file_path: file_path.into(),
            line,
            column,
            message: if message.is_empty() {
                "error".to_string()
            } else {
                message.to_string()
            },
            category,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn column(&self) -> Option<u32> {
        self.column
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// Wire form of an [`Issue`]; deserializing goes through [`Issue::new`].
#[derive(Deserialize)]
struct IssueFields {
    file_path: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
    #[serde(default)]
    message: String,
    category: Category,
}

impl From<IssueFields> for Issue {
    fn from(f: IssueFields) -> Self {
        Issue::new(f.category, f.file_path, f.line, f.column, f.message)
    }
}

/// Gate outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Block { report: String },
}

impl Decision {
    pub fn is_block(&self) -> bool {
        matches!(self, Decision::Block { .. })
    }
}

/// Full result of one evaluation, kept for the decision log.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Whether the invocation matched the trigger table.
    pub triggered: bool,
    pub issues: Vec<Issue>,
    pub decision: Decision,
}

/// The completion gate.
pub struct Gate {
    triggers: TriggerTable,
    checkers: Vec<Box<dyn Checker>>,
    runner: Box<dyn CommandRunner>,
    root: PathBuf,
    max_reported: usize,
}

impl Gate {
    /// Create a gate with an explicit battery.
    pub fn new(
        triggers: TriggerTable,
        checkers: Vec<Box<dyn Checker>>,
        runner: Box<dyn CommandRunner>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            triggers,
            checkers,
            runner,
            root: root.into(),
            max_reported: DEFAULT_MAX_REPORTED,
        }
    }

    /// Build the gate described by a config.
    pub fn from_config(
        config: &Config,
        runner: Box<dyn CommandRunner>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            config.trigger.clone(),
            checks::battery(&config.checks),
            runner,
            root,
        )
        .with_max_reported(config.report.max_issues)
    }

    /// Limit the number of issues rendered in a report.
    pub fn with_max_reported(mut self, max_reported: usize) -> Self {
        self.max_reported = max_reported;
        self
    }

    /// Decide on an invocation.
    pub fn evaluate(&self, invocation: &Invocation) -> Decision {
        self.evaluate_detailed(invocation).decision
    }

    /// Decide on an invocation and keep the collected issues.
    pub fn evaluate_detailed(&self, invocation: &Invocation) -> Evaluation {
        if !self
            .triggers
            .matches(&invocation.tool_name, &invocation.command)
        {
            return Evaluation {
                triggered: false,
                issues: Vec::new(),
                decision: Decision::Allow,
            };
        }

        info!(root = %self.root.display(), "Completion announced, running checks");
        let issues = self.run_battery();

        let decision = if issues.is_empty() {
            info!("All checks passed, completion allowed");
            Decision::Allow
        } else {
            info!(count = issues.len(), "Blocking completion");
            Decision::Block {
                report: report::render(&issues, self.max_reported),
            }
        };

        Evaluation {
            triggered: true,
            issues,
            decision,
        }
    }

    fn run_battery(&self) -> Vec<Issue> {
        let ctx = CheckContext {
            root: &self.root,
            runner: self.runner.as_ref(),
        };

        let mut issues = Vec::new();
        for checker in &self.checkers {
            let result = panic::catch_unwind(AssertUnwindSafe(|| checker.check(&ctx)))
                .unwrap_or_else(|payload| Err(CheckError::from_panic(payload)));

            match result {
                Ok(found) => {
                    debug!(checker = checker.name(), count = found.len(), "Checker finished");
                    issues.extend(found);
                }
                Err(e) => {
                    warn!(checker = checker.name(), error = %e, "Checker failed, skipping");
                }
            }
        }
        issues
    }
}
