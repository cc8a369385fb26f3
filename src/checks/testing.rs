//! Test doubles for [`CommandRunner`].

use std::cell::{Cell, RefCell};
use std::io;
use std::path::Path;
use std::rc::Rc;

use super::{CheckError, CommandOutput, CommandRunner, CommandSpec};

/// Counts calls and reports every command as a silent success.
#[derive(Default)]
pub struct SpyRunner {
    calls: Rc<Cell<usize>>,
}

impl SpyRunner {
    /// Shared call counter, readable after the runner moves into a gate.
    pub fn calls(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl CommandRunner for SpyRunner {
    fn run(&self, _spec: &CommandSpec, _cwd: &Path) -> Result<CommandOutput, CheckError> {
        self.calls.set(self.calls.get() + 1);
        Ok(CommandOutput::new(Some(0), "", ""))
    }
}

enum Reply {
    Output(CommandOutput),
    Missing,
    Timeout,
}

struct Rule {
    program: String,
    arg: Option<String>,
    reply: Reply,
}

/// Replies per program (and optionally per argument); unmatched commands
/// succeed with no output. Every call is recorded.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    log: Rc<RefCell<Vec<CommandSpec>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, program: &str, output: CommandOutput) -> Self {
        self.push(program, None, Reply::Output(output));
        self
    }

    /// Reply only when some argument contains `arg`.
    pub fn on_arg(mut self, program: &str, arg: &str, output: CommandOutput) -> Self {
        self.push(program, Some(arg), Reply::Output(output));
        self
    }

    pub fn on_missing(mut self, program: &str) -> Self {
        self.push(program, None, Reply::Missing);
        self
    }

    pub fn on_timeout(mut self, program: &str) -> Self {
        self.push(program, None, Reply::Timeout);
        self
    }

    /// Time out only when some argument contains `arg`.
    pub fn on_arg_timeout(mut self, program: &str, arg: &str) -> Self {
        self.push(program, Some(arg), Reply::Timeout);
        self
    }

    /// Shared log of executed commands.
    pub fn log(&self) -> Rc<RefCell<Vec<CommandSpec>>> {
        Rc::clone(&self.log)
    }

    fn push(&mut self, program: &str, arg: Option<&str>, reply: Reply) {
        self.rules.push(Rule {
            program: program.to_string(),
            arg: arg.map(str::to_string),
            reply,
        });
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec, _cwd: &Path) -> Result<CommandOutput, CheckError> {
        self.log.borrow_mut().push(spec.clone());

        let rule = self.rules.iter().find(|r| {
            r.program == spec.program
                && r
                    .arg
                    .as_ref()
                    .map_or(true, |a| spec.args.iter().any(|s| s.contains(a.as_str())))
        });

        match rule.map(|r| &r.reply) {
            Some(Reply::Output(output)) => Ok(output.clone()),
            Some(Reply::Missing) => Err(CheckError::ToolUnavailable {
                program: spec.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "command not found"),
            }),
            Some(Reply::Timeout) => Err(CheckError::TimedOut {
                program: spec.program.clone(),
                secs: 10,
            }),
            None => Ok(CommandOutput::new(Some(0), "", "")),
        }
    }
}
