//! Docker Compose configuration check.

use super::{first_line, CheckContext, CheckError, Checker, CommandSpec};
use crate::config::ComposeConfig;
use crate::gate::{Category, Issue};

/// Compose file names, in lookup order.
const COMPOSE_FILES: &[&str] = &[
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
];

/// Validates the compose file with `docker compose config`.
pub struct ComposeChecker {
    config: ComposeConfig,
}

impl ComposeChecker {
    pub fn new(config: ComposeConfig) -> Self {
        Self { config }
    }
}

impl Checker for ComposeChecker {
    fn name(&self) -> &'static str {
        "compose"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, CheckError> {
        let Some(file) = COMPOSE_FILES.iter().find(|f| ctx.root.join(f).is_file()) else {
            return Ok(Vec::new());
        };

        let spec = CommandSpec::from_argv(&self.config.command)?;
        let output = ctx.runner.run(&spec, ctx.root)?;
        if output.success() {
            return Ok(Vec::new());
        }

        let message = first_line(&output.stderr)
            .or_else(|| first_line(&output.stdout))
            .unwrap_or("invalid compose configuration");
        Ok(vec![Issue::new(Category::Config, *file, None, None, message)])
    }
}
