//! Pipeline — sequences runner, event builder, and delivery for one check.
//!
//! The flow is strictly linear and synchronous: one subprocess execution,
//! one event construction, one output action. Nothing is retained across
//! invocations; the process runs one check and exits.
//!
//! The process exit code is deliberately not tied to the check's computed
//! status: the wrapper exits 0 whenever the pipeline completed, non-zero
//! only on a fatal error in one of the stages.

use std::io::{self, Write};

use serde_json::{Map, Value};

use crate::config::CheckConfig;
use crate::errors::CheckError;
use crate::event;
use crate::runner::CommandRunner;
use crate::transport;

/// Run the check command and build its event, without delivering it.
pub fn execute_check(
    config: &CheckConfig,
    runner: &dyn CommandRunner,
) -> Result<Map<String, Value>, CheckError> {
    let result = runner.run(&config.command)?;
    event::build_event(config, &result)
}

/// Run the full pipeline: execute, build, deliver. Dry-run output goes to
/// stdout.
pub fn run(config: &CheckConfig, runner: &dyn CommandRunner) -> Result<(), CheckError> {
    let stdout = io::stdout();
    run_with_output(config, runner, &mut stdout.lock())
}

/// `run` with an injectable writer for the dry-run output.
pub fn run_with_output(
    config: &CheckConfig,
    runner: &dyn CommandRunner,
    out: &mut impl Write,
) -> Result<(), CheckError> {
    let event = execute_check(config, runner)?;
    transport::deliver(&event, config, out)
}
