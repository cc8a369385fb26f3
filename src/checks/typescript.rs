//! TypeScript type checker.

use tracing::debug;

use super::{has_any, CheckContext, CheckError, Checker, CommandSpec};
use crate::config::TypeScriptConfig;
use crate::gate::{Category, Issue};
use crate::patterns;

/// Files marking a TypeScript/JavaScript project.
const MARKERS: &[&str] = &["package.json", "tsconfig.json"];

/// Runs the configured type-check command and collects `error TSxxxx` lines.
pub struct TypeScriptChecker {
    config: TypeScriptConfig,
}

impl TypeScriptChecker {
    pub fn new(config: TypeScriptConfig) -> Self {
        Self { config }
    }
}

impl Checker for TypeScriptChecker {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, CheckError> {
        if !has_any(ctx.root, MARKERS) {
            debug!("No package.json or tsconfig.json, skipping type check");
            return Ok(Vec::new());
        }

        let spec = CommandSpec::from_argv(&self.config.command)?;
        // Non-zero exit is how tsc reports errors; only the text matters.
        let output = ctx.runner.run(&spec, ctx.root)?;

        Ok(output
            .combined()
            .lines()
            .filter_map(patterns::parse_tsc_line)
            .take(self.config.max_issues)
            .map(|d| {
                Issue::new(
                    Category::TypeScript,
                    d.file,
                    Some(d.line),
                    Some(d.column),
                    d.message,
                )
            })
            .collect())
    }
}
