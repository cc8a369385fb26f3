//! Configuration management for donegate.
//!
//! Looked up in order: `<project>/.donegate/config.toml`, then
//! `<config dir>/donegate/config.toml`, then built-in defaults. Every field
//! has a default, so partial files are fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::gate::DEFAULT_MAX_REPORTED;
use crate::patterns::TriggerTable;

/// Project state directory name.
pub const STATE_DIR: &str = ".donegate";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Which tool calls count as completion announcements.
    #[serde(default)]
    pub trigger: TriggerTable,

    #[serde(default)]
    pub checks: ChecksConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Checker kinds, used to order the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Typescript,
    Python,
    Lint,
    Compose,
    Git,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecksConfig {
    /// Per-process timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Battery order. Kinds left out never run.
    #[serde(default = "default_order")]
    pub order: Vec<CheckKind>,

    #[serde(default)]
    pub typescript: TypeScriptConfig,

    #[serde(default)]
    pub python: PythonConfig,

    #[serde(default)]
    pub lint: LintConfig,

    #[serde(default)]
    pub compose: ComposeConfig,

    #[serde(default)]
    pub git: GitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeScriptConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Type-check command, run from the project root.
    #[serde(default = "default_tsc_command")]
    pub command: Vec<String>,

    #[serde(default = "default_three")]
    pub max_issues: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PythonConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Compile command; the file path is appended.
    #[serde(default = "default_py_compile_command")]
    pub command: Vec<String>,

    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Only files modified within this many minutes. 0 checks every file.
    #[serde(default = "default_recent_minutes")]
    pub recent_minutes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LintConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_lint_command")]
    pub command: Vec<String>,

    #[serde(default = "default_three")]
    pub max_issues: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComposeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_compose_command")]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_git_command")]
    pub command: Vec<String>,

    /// Report when more than this many paths are uncommitted.
    #[serde(default = "default_git_threshold")]
    pub threshold: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportConfig {
    /// Issues rendered in a block report.
    #[serde(default = "default_report_max")]
    pub max_issues: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log file, relative paths resolve against the project root.
    #[serde(default = "default_log_path")]
    pub path: PathBuf,

    /// Rotate once the file reaches this size.
    #[serde(default = "default_log_max_bytes")]
    pub max_bytes: u64,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_three() -> usize {
    3
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_order() -> Vec<CheckKind> {
    vec![
        CheckKind::Typescript,
        CheckKind::Python,
        CheckKind::Lint,
        CheckKind::Compose,
        CheckKind::Git,
    ]
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn default_tsc_command() -> Vec<String> {
    argv(&["npx", "--no-install", "tsc", "--noEmit", "--pretty", "false"])
}

fn default_py_compile_command() -> Vec<String> {
    argv(&["python3", "-m", "py_compile"])
}

fn default_max_files() -> usize {
    5
}

fn default_recent_minutes() -> u64 {
    10
}

fn default_lint_command() -> Vec<String> {
    argv(&["npm", "run", "lint", "--silent"])
}

fn default_compose_command() -> Vec<String> {
    argv(&["docker", "compose", "config", "-q"])
}

fn default_git_command() -> Vec<String> {
    argv(&["git", "status", "--porcelain"])
}

fn default_git_threshold() -> usize {
    10
}

fn default_report_max() -> usize {
    DEFAULT_MAX_REPORTED
}

fn default_log_path() -> PathBuf {
    PathBuf::from(STATE_DIR).join("decisions.jsonl")
}

fn default_log_max_bytes() -> u64 {
    1024 * 1024
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            order: default_order(),
            typescript: TypeScriptConfig::default(),
            python: PythonConfig::default(),
            lint: LintConfig::default(),
            compose: ComposeConfig::default(),
            git: GitConfig::default(),
        }
    }
}

impl ChecksConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for TypeScriptConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_tsc_command(),
            max_issues: default_three(),
        }
    }
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_py_compile_command(),
            max_files: default_max_files(),
            recent_minutes: default_recent_minutes(),
        }
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_lint_command(),
            max_issues: default_three(),
        }
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_compose_command(),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: default_git_command(),
            threshold: default_git_threshold(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_issues: default_report_max(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_log_path(),
            max_bytes: default_log_max_bytes(),
        }
    }
}

impl LogConfig {
    /// Log path resolved against the project root.
    pub fn resolved_path(&self, project_root: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            project_root.join(&self.path)
        }
    }
}

impl Config {
    /// Project config path.
    pub fn path(project_root: &Path) -> PathBuf {
        project_root.join(STATE_DIR).join("config.toml")
    }

    /// User-wide config path.
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("donegate").join("config.toml"))
    }

    /// Load the config that applies to a project.
    pub fn load(project_root: &Path) -> Result<Self, Error> {
        let project = Self::path(project_root);
        if project.exists() {
            return Self::load_file(&project);
        }

        if let Some(global) = Self::global_path().filter(|p| p.exists()) {
            return Self::load_file(&global);
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load a specific config file.
    pub fn load_file(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save config into a project directory.
    pub fn save(&self, project_root: &Path) -> Result<(), Error> {
        let path = Self::path(project_root);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let with_header = format!(
            "# donegate configuration\n# Edit directly; missing keys fall back to defaults\n\n{}",
            self.to_toml()?
        );
        fs::write(path, with_header)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.trigger.tool_names, vec!["Bash"]);
        assert_eq!(config.checks.typescript.max_issues, 3);
        assert_eq!(config.checks.python.max_files, 5);
        assert_eq!(config.report.max_issues, 5);
        assert!(!config.checks.git.enabled);
        assert_eq!(config.checks.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();

        let mut config = Config::default();
        config.checks.git.enabled = true;
        config.trigger.phrases.push("shipped".to_string());
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[checks]\ntimeout_secs = 3\norder = [\"python\"]\n\n[checks.python]\nmax_files = 2\n",
        )
        .unwrap();

        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.checks.timeout_secs, 3);
        assert_eq!(config.checks.order, vec![CheckKind::Python]);
        assert_eq!(config.checks.python.max_files, 2);
        assert_eq!(config.checks.python.recent_minutes, 10);
        assert_eq!(config.trigger, TriggerTable::default());
        assert!(config.log.enabled);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[checks\n").unwrap();

        let err = Config::load_file(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_log_path_resolution() {
        let log = LogConfig::default();
        assert_eq!(
            log.resolved_path(Path::new("/work")),
            PathBuf::from("/work/.donegate/decisions.jsonl")
        );

        let log = LogConfig {
            path: PathBuf::from("/var/log/donegate.jsonl"),
            ..LogConfig::default()
        };
        assert_eq!(
            log.resolved_path(Path::new("/work")),
            PathBuf::from("/var/log/donegate.jsonl")
        );
    }
}
