//! The hook command: read one event from stdin, answer on stdout.
//!
//! Always exits successfully. Any fault on the way (bad input, bad
//! config, log write failure) is logged to stderr and the call is allowed.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::checks::SystemRunner;
use crate::config::Config;
use crate::error::Error;
use crate::gate::Gate;
use crate::hook::{self, HookEvent};
use crate::storage::{DecisionLog, DecisionRecord};

/// Run the hook against stdin.
pub fn run(root: Option<PathBuf>) -> Result<(), Error> {
    let mut input = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut input) {
        warn!(error = %e, "Failed to read hook event, allowing");
        return Ok(());
    }

    if let Some(line) = respond_bytes(&input, root.as_deref()) {
        println!("{}", line);
    }
    Ok(())
}

/// Evaluate one raw event as read from stdin. Input that is not UTF-8 is
/// allowed like any other malformed event.
pub fn respond_bytes(input: &[u8], root: Option<&Path>) -> Option<String> {
    match std::str::from_utf8(input) {
        Ok(text) => respond(text, root),
        Err(e) => {
            warn!(error = %e, "Hook event is not UTF-8, allowing");
            None
        }
    }
}

/// Evaluate one raw event. `None` means allow silently.
pub fn respond(input: &str, root: Option<&Path>) -> Option<String> {
    match evaluate_event(input, root) {
        Ok(line) => line,
        Err(e) => {
            warn!(error = %e, "Completion gate failed, allowing");
            None
        }
    }
}

fn evaluate_event(input: &str, root: Option<&Path>) -> Result<Option<String>, Error> {
    let event = HookEvent::parse(input)?;
    let invocation = event.invocation()?;
    let root = resolve_root(root, event.cwd.as_deref())?;
    let config = Config::load(&root)?;

    let runner = SystemRunner::new(config.checks.timeout());
    let gate = Gate::from_config(&config, Box::new(runner), &root);
    let evaluation = gate.evaluate_detailed(&invocation);

    if evaluation.triggered && config.log.enabled {
        let log = DecisionLog::from_config(&config.log, &root);
        if let Err(e) = log.append(&DecisionRecord::from_evaluation(&invocation, &evaluation)) {
            warn!(error = %e, path = %log.path().display(), "Failed to log decision");
        }
    }

    hook::render_response(&evaluation.decision)
}

/// Explicit root, else the session cwd from the event, else the process cwd.
fn resolve_root(explicit: Option<&Path>, event_cwd: Option<&str>) -> Result<PathBuf, Error> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    if let Some(cwd) = event_cwd.map(PathBuf::from).filter(|p| p.is_dir()) {
        return Ok(cwd);
    }
    Ok(std::env::current_dir()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::TempDir;

    fn event(command: &str) -> String {
        serde_json::json!({
            "tool_name": "Bash",
            "tool_input": { "command": command }
        })
        .to_string()
    }

    #[test]
    fn test_non_completion_is_silent_and_unlogged() {
        let dir = TempDir::new().unwrap();
        assert_eq!(respond(&event("cargo build"), Some(dir.path())), None);
        assert!(!dir.path().join(".donegate").exists());
    }

    #[test]
    fn test_malformed_input_allows() {
        let dir = TempDir::new().unwrap();
        assert_eq!(respond("{not json", Some(dir.path())), None);
        assert_eq!(respond("{}", Some(dir.path())), None);
        assert_eq!(respond("", Some(dir.path())), None);
    }

    #[test]
    fn test_non_utf8_input_allows() {
        let dir = TempDir::new().unwrap();
        let mut input = vec![0xff, 0xfe];
        input.extend_from_slice(br#"{"tool_name":"Bash","tool_input":{"command":"echo all done"}}"#);

        assert_eq!(respond_bytes(&input, Some(dir.path())), None);
        assert!(!dir.path().join(".donegate").exists());
    }

    #[test]
    fn test_utf8_bytes_evaluated() {
        let dir = TempDir::new().unwrap();
        assert_eq!(respond_bytes(event("echo finished").as_bytes(), Some(dir.path())), None);
        assert!(dir.path().join(".donegate/decisions.jsonl").exists());
    }

    #[test]
    fn test_broken_config_allows() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".donegate")).unwrap();
        fs::write(dir.path().join(".donegate/config.toml"), "[[[").unwrap();

        assert_eq!(respond(&event("echo all done"), Some(dir.path())), None);
    }

    #[test]
    fn test_clean_tree_allows_and_logs() {
        let dir = TempDir::new().unwrap();
        assert_eq!(respond(&event("echo 'All done!'"), Some(dir.path())), None);

        let log = DecisionLog::from_config(&Config::default().log, dir.path());
        let records = log.tail(10).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].blocked);
    }

    #[test]
    fn test_event_cwd_used_as_root() {
        let dir = TempDir::new().unwrap();
        let input = serde_json::json!({
            "tool_name": "Bash",
            "cwd": dir.path(),
            "tool_input": { "command": "echo finished" }
        })
        .to_string();

        assert_eq!(respond(&input, None), None);
        assert!(dir.path().join(".donegate/decisions.jsonl").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_checker_blocks() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.py"), "def (:\n").unwrap();

        let mut config = Config::default();
        config.checks.python.command = vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo 'SyntaxError: invalid syntax' >&2; exit 1".to_string(),
        ];
        config.log.enabled = false;
        config.save(dir.path()).unwrap();

        let line = respond(&event("echo ALL DONE"), Some(dir.path())).unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["action"], "block");

        let message = value["message"].as_str().unwrap();
        assert!(message.starts_with("Cannot mark complete - found 1 issue(s):"));
        assert!(message.contains("broken.py\n  [Python] SyntaxError: invalid syntax"));
        assert!(!dir.path().join(".donegate/decisions.jsonl").exists());
    }
}
