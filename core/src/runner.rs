//! Command runner — executes the check command under the platform shell.
//!
//! `CommandRunner` is the trait the pipeline uses to execute the check.
//! `ShellRunner` is the production implementation that spawns `sh -c`, so
//! pipes, redirection, and shell builtins inside the command string work.
//! `MockRunner` is the test double that records calls and returns preset
//! results.

use std::cell::RefCell;
use std::fmt;
use std::io;
use std::process::{Command, Stdio};

/// Outcome of one check-command execution.
///
/// `output` is the child's captured stdout, byte-for-byte (not trimmed).
/// stderr is inherited by the child so check diagnostics reach the operator
/// directly; it is never part of the event. `pid` is informational metadata
/// for the event record.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub output: String,
    pub pid: u32,
}

/// The check command could not be executed, so no exit code exists to
/// report. This aborts the run before any event is built.
#[derive(Debug)]
pub enum SpawnError {
    /// The shell itself could not be started.
    Shell { command: String, error: io::Error },
    /// The shell exited with status 127: it could not resolve the command.
    CommandNotFound { command: String },
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::Shell { command, error } => {
                write!(f, "failed to execute '{}': {}", command, error)
            }
            SpawnError::CommandNotFound { command } => {
                write!(f, "command not found: '{}'", command)
            }
        }
    }
}

impl std::error::Error for SpawnError {}

/// Trait for executing a check command string.
pub trait CommandRunner {
    fn run(&self, command: &str) -> Result<CommandResult, SpawnError>;
}

/// Production runner that spawns `sh -c <command>` and blocks until the
/// child exits. No timeout is enforced here.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<CommandResult, SpawnError> {
        let child = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|error| SpawnError::Shell {
                command: command.to_string(),
                error,
            })?;
        let pid = child.id();

        let output = child.wait_with_output().map_err(|error| SpawnError::Shell {
            command: command.to_string(),
            error,
        })?;

        let exit_code = match output.status.code() {
            // 127 is the POSIX shell's "command not found" status; there is
            // no check exit code to report in that case.
            Some(127) => {
                return Err(SpawnError::CommandNotFound {
                    command: command.to_string(),
                })
            }
            Some(code) => code,
            // Terminated by a signal: report critical.
            None => 2,
        };

        Ok(CommandResult {
            exit_code,
            output: String::from_utf8_lossy(&output.stdout).to_string(),
            pid,
        })
    }
}

/// Test-double runner that records commands and returns pre-configured
/// results.
pub struct MockRunner {
    responses: RefCell<Vec<Result<CommandResult, SpawnError>>>,
    commands: RefCell<Vec<String>>,
}

impl MockRunner {
    pub fn with_responses(responses: Vec<Result<CommandResult, SpawnError>>) -> Self {
        let mut reversed = responses;
        reversed.reverse();
        MockRunner {
            responses: RefCell::new(reversed),
            commands: RefCell::new(Vec::new()),
        }
    }

    pub fn new() -> Self {
        MockRunner {
            responses: RefCell::new(Vec::new()),
            commands: RefCell::new(Vec::new()),
        }
    }

    /// Shortcut for a runner that yields a single successful execution.
    pub fn with_result(exit_code: i32, output: &str) -> Self {
        Self::with_responses(vec![Ok(CommandResult {
            exit_code,
            output: output.to_string(),
            pid: 4242,
        })])
    }

    pub fn executed_commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &str) -> Result<CommandResult, SpawnError> {
        self.commands.borrow_mut().push(command.to_string());
        let mut responses = self.responses.borrow_mut();
        if let Some(response) = responses.pop() {
            response
        } else {
            Ok(CommandResult {
                exit_code: 0,
                output: String::new(),
                pid: 4242,
            })
        }
    }
}
