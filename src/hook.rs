//! Hook protocol: the event read from stdin and the record written to stdout.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::gate::{Decision, Invocation};

/// Pre-tool-use event sent by the host.
///
/// Only the fields the gate needs are kept; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct HookEvent {
    #[serde(alias = "toolName")]
    pub tool_name: Option<String>,

    #[serde(default, alias = "toolInput")]
    pub tool_input: Value,

    /// Working directory of the session, if the host sends it.
    #[serde(default)]
    pub cwd: Option<String>,
}

impl HookEvent {
    pub fn parse(input: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(input)?)
    }

    /// Extract the invocation. A missing command reads as empty.
    pub fn invocation(&self) -> Result<Invocation, Error> {
        let tool_name = self
            .tool_name
            .as_deref()
            .ok_or_else(|| Error::InvalidEvent("missing tool_name".to_string()))?;
        let command = self
            .tool_input
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok(Invocation::new(tool_name, command))
    }
}

/// Record printed when the gate blocks.
#[derive(Debug, Serialize)]
struct BlockRecord<'a> {
    action: &'static str,
    message: &'a str,
}

/// Render the stdout line for a decision. `Allow` prints nothing.
pub fn render_response(decision: &Decision) -> Result<Option<String>, Error> {
    match decision {
        Decision::Allow => Ok(None),
        Decision::Block { report } => Ok(Some(serde_json::to_string(&BlockRecord {
            action: "block",
            message: report,
        })?)),
    }
}
