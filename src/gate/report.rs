//! Block report rendering.

use super::Issue;

/// Closing hint appended to every report.
pub const FIX_HINT: &str = "To fix: address the issues above, then try completing again.";

/// Location shown for issues not tied to a file.
const NO_FILE: &str = "(working tree)";

/// Render the report for a non-empty issue list.
///
/// The header counts every issue; the body lists at most `max_reported`.
pub fn render(issues: &[Issue], max_reported: usize) -> String {
    let mut out = format!("Cannot mark complete - found {} issue(s):\n\n", issues.len());

    for issue in issues.iter().take(max_reported) {
        out.push_str(&location(issue));
        out.push('\n');
        out.push_str(&format!("  [{}] {}\n", issue.category(), issue.message()));
    }

    out.push('\n');
    out.push_str(FIX_HINT);
    out
}

/// `file:line:column`, `file:line` or `file`.
pub fn location(issue: &Issue) -> String {
    let file = if issue.file_path().is_empty() {
        NO_FILE
    } else {
        issue.file_path()
    };

    match (issue.line(), issue.column()) {
        (Some(line), Some(column)) => format!("{}:{}:{}", file, line, column),
        (Some(line), None) => format!("{}:{}", file, line),
        _ => file.to_string(),
    }
}
