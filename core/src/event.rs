//! Event assembly — builds the monitoring event from configuration and
//! command result.
//!
//! The event is an ordered JSON map: optional `--json-file` seed values
//! first, then the base fields, then the `--extra` fragments merged
//! last-write-wins. It is built exactly once per run and not touched again
//! after the merge.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::config::CheckConfig;
use crate::errors::CheckError;
use crate::fields;
use crate::runner::CommandResult;

/// Translate a subprocess exit code into an event status.
///
/// Nagios-compatible checks pass their code through unchanged. Legacy
/// checks only know success/failure, so any non-zero code collapses to 2
/// ("critical" in the destination schema).
pub fn translate_status(exit_code: i32, nagios: bool) -> i32 {
    if nagios || exit_code == 0 {
        exit_code
    } else {
        2
    }
}

/// Build the event record for one completed check execution.
///
/// All eight base fields are always present (absent options serialize as
/// `null`). Extra-field fragments may overwrite any of them, including
/// `status`.
pub fn build_event(
    config: &CheckConfig,
    result: &CommandResult,
) -> Result<Map<String, Value>, CheckError> {
    let mut event = match &config.json_file {
        Some(path) => read_seed_file(path)?,
        None => Map::new(),
    };

    let status = translate_status(result.exit_code, config.nagios);

    event.insert("name".into(), Value::String(config.name.clone()));
    // The destination schema expects the check name here too, not the
    // executed command line.
    event.insert("command".into(), Value::String(config.name.clone()));
    event.insert("status".into(), Value::from(status));
    event.insert("output".into(), Value::String(result.output.clone()));
    event.insert("handler".into(), opt_string(&config.handler));
    event.insert(
        "ttl".into(),
        config.ttl.map(Value::from).unwrap_or(Value::Null),
    );
    event.insert("source".into(), opt_string(&config.source));
    event.insert("pid".into(), Value::from(result.pid));

    for fragment in &config.extra {
        let pairs = fields::parse_fragment(fragment).map_err(|error| {
            CheckError::MalformedField {
                fragment: fragment.clone(),
                error,
            }
        })?;
        for (key, value) in pairs {
            event.insert(key, value);
        }
    }

    Ok(event)
}

fn opt_string(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::String(text.clone()),
        None => Value::Null,
    }
}

/// Read a `--json-file` seed: a JSON object whose members the base fields
/// are written over.
fn read_seed_file(path: &Path) -> Result<Map<String, Value>, CheckError> {
    let raw = fs::read_to_string(path).map_err(|error| CheckError::JsonFile {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })?;
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CheckError::JsonFile {
            path: path.to_path_buf(),
            reason: "top-level value is not a JSON object".into(),
        }),
        Err(error) => Err(CheckError::JsonFile {
            path: path.to_path_buf(),
            reason: error.to_string(),
        }),
    }
}
