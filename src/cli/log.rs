//! Print recent gate decisions.

use crate::config::Config;
use crate::error::Error;
use crate::gate::report;
use crate::storage::{DecisionLog, DecisionRecord};

/// Show the last `count` logged decisions.
pub fn show(count: usize) -> Result<(), Error> {
    let project_root = std::env::current_dir()?;
    let config = Config::load(&project_root)?;
    let log = DecisionLog::from_config(&config.log, &project_root);

    let records = log.tail(count)?;
    if records.is_empty() {
        println!("No decisions logged at {}", log.path().display());
        return Ok(());
    }

    for record in &records {
        print!("{}", format_record(record));
    }
    Ok(())
}

fn format_record(record: &DecisionRecord) -> String {
    let verdict = if record.blocked { "BLOCK" } else { "ALLOW" };
    let mut out = format!(
        "{} {} {} issue(s)\n",
        record.timestamp, verdict, record.issue_count
    );
    for issue in &record.issues {
        out.push_str(&format!(
            "  {} [{}] {}\n",
            report::location(issue),
            issue.category(),
            issue.message()
        ));
    }
    out
}
