//! Linter check for JavaScript projects.

use tracing::debug;

use super::{has_any, CheckContext, CheckError, Checker, CommandSpec};
use crate::config::LintConfig;
use crate::gate::{Category, Issue};
use crate::patterns;

/// Runs the project's lint script and collects `error` lines.
pub struct LintChecker {
    config: LintConfig,
}

impl LintChecker {
    pub fn new(config: LintConfig) -> Self {
        Self { config }
    }
}

impl Checker for LintChecker {
    fn name(&self) -> &'static str {
        "lint"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, CheckError> {
        if !has_any(ctx.root, &["package.json"]) {
            debug!("No package.json, skipping lint");
            return Ok(Vec::new());
        }

        let spec = CommandSpec::from_argv(&self.config.command)?;
        let output = ctx.runner.run(&spec, ctx.root)?;

        Ok(output
            .combined()
            .lines()
            .filter_map(patterns::parse_lint_line)
            .take(self.config.max_issues)
            .map(|d| Issue::new(Category::Lint, d.file, Some(d.line), Some(d.column), d.message))
            .collect())
    }
}
