//! Initialize donegate for a project.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::cli::gitignore;
use crate::config::{Config, STATE_DIR};
use crate::error::Error;

/// Run the init command in the current directory.
pub fn run() -> Result<(), Error> {
    let project_root = std::env::current_dir()?;
    init_project(&project_root)
}

/// Create the state directory, default config and .gitignore entry.
pub fn init_project(project_root: &Path) -> Result<(), Error> {
    let state_dir = project_root.join(STATE_DIR);
    fs::create_dir_all(&state_dir)?;

    let config_path = Config::path(project_root);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
    } else {
        Config::default().save(project_root)?;
        info!(path = %config_path.display(), "Created config");
        println!("Created {}", config_path.display());
    }

    let config = Config::load(project_root)?;
    let entries = gitignore::ignore_entries(project_root, &config.log);
    let added = gitignore::ensure_ignored(&project_root.join(".gitignore"), &entries)?;
    if !added.is_empty() {
        info!(entries = ?added, "Updated .gitignore");
    }

    println!("donegate initialized.");
    println!("Register `donegate check` as a PreToolUse hook for the Bash tool.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_config_and_gitignore() {
        let dir = TempDir::new().unwrap();

        init_project(dir.path()).unwrap();

        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
        let ignore = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert!(ignore.contains("/.donegate/"));
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.report.max_issues = 9;
        config.save(dir.path()).unwrap();

        init_project(dir.path()).unwrap();

        assert_eq!(Config::load(dir.path()).unwrap().report.max_issues, 9);
    }

    #[test]
    fn test_init_ignores_custom_log_inside_project() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.log.path = "logs/decisions.jsonl".into();
        config.save(dir.path()).unwrap();

        init_project(dir.path()).unwrap();
        init_project(dir.path()).unwrap();

        let ignore = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(ignore.matches("/logs/decisions.jsonl\n").count(), 1);
        assert!(ignore.contains("/logs/decisions.jsonl.1"));
    }
}
