//! Uncommitted changes check.

use super::{CheckContext, CheckError, Checker, CommandSpec};
use crate::config::GitConfig;
use crate::gate::{Category, Issue};

/// Flags a working tree with many uncommitted paths.
pub struct GitStatusChecker {
    config: GitConfig,
}

impl GitStatusChecker {
    pub fn new(config: GitConfig) -> Self {
        Self { config }
    }
}

impl Checker for GitStatusChecker {
    fn name(&self) -> &'static str {
        "git"
    }

    fn check(&self, ctx: &CheckContext<'_>) -> Result<Vec<Issue>, CheckError> {
        if !ctx.root.join(".git").exists() {
            return Ok(Vec::new());
        }

        let spec = CommandSpec::from_argv(&self.config.command)?;
        let output = ctx.runner.run(&spec, ctx.root)?;
        if !output.success() {
            return Ok(Vec::new());
        }

        let changed = output.stdout.lines().filter(|l| !l.trim().is_empty()).count();
        if changed <= self.config.threshold {
            return Ok(Vec::new());
        }

        Ok(vec![Issue::new(
            Category::Other,
            "",
            None,
            None,
            format!("{} files have uncommitted changes", changed),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::ScriptedRunner;
    use crate::checks::CommandOutput;
    use std::fs;
    use tempfile::TempDir;

    fn porcelain(n: usize) -> String {
        (0..n).map(|i| format!(" M src/f{}.rs\n", i)).collect()
    }

    fn repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        dir
    }

    #[test]
    fn test_over_threshold() {
        let dir = repo();
        let runner = ScriptedRunner::new().on("git", CommandOutput::new(Some(0), porcelain(12), ""));
        let ctx = CheckContext {
            root: dir.path(),
            runner: &runner,
        };

        let issues = GitStatusChecker::new(GitConfig::default()).check(&ctx).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message(), "12 files have uncommitted changes");
        assert_eq!(issues[0].file_path(), "");
    }

    #[test]
    fn test_at_threshold_is_fine() {
        let dir = repo();
        let runner = ScriptedRunner::new().on("git", CommandOutput::new(Some(0), porcelain(10), ""));
        let ctx = CheckContext {
            root: dir.path(),
            runner: &runner,
        };

        assert!(GitStatusChecker::new(GitConfig::default())
            .check(&ctx)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_not_a_repo() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new().on("git", CommandOutput::new(Some(0), porcelain(50), ""));
        let ctx = CheckContext {
            root: dir.path(),
            runner: &runner,
        };

        assert!(GitStatusChecker::new(GitConfig::default())
            .check(&ctx)
            .unwrap()
            .is_empty());
    }
}
