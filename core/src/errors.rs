//! Pipeline errors.
//!
//! Every fatal condition a run can hit is a variant of `CheckError`. There
//! is no recovery and no retry anywhere: errors surface to the operator
//! through the process exit code and a single diagnostic line.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::fields::FieldParseError;
use crate::runner::SpawnError;

#[derive(Debug)]
pub enum CheckError {
    /// The check command could not be executed; no event is built.
    Spawn(SpawnError),
    /// An `--extra` fragment could not be parsed; no partial event is sent.
    MalformedField {
        fragment: String,
        error: FieldParseError,
    },
    /// The `--json-file` seed could not be read or is not a JSON object.
    JsonFile { path: PathBuf, reason: String },
    /// The event map could not be serialized.
    Serialize(serde_json::Error),
    /// Dry-run mode could not write the event to stdout.
    Stdout(io::Error),
    /// The event could not be delivered. One attempt only; losing a
    /// monitoring event silently would defeat the tool's purpose, so this
    /// is fatal.
    Transport {
        destination: String,
        error: io::Error,
    },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Spawn(error) => write!(f, "{}", error),
            CheckError::MalformedField { fragment, error } => {
                write!(f, "malformed extra field '{}': {}", fragment, error)
            }
            CheckError::JsonFile { path, reason } => {
                write!(f, "cannot use JSON file {}: {}", path.display(), reason)
            }
            CheckError::Serialize(error) => {
                write!(f, "failed to serialize event: {}", error)
            }
            CheckError::Stdout(error) => {
                write!(f, "failed to write event to stdout: {}", error)
            }
            CheckError::Transport { destination, error } => {
                write!(f, "failed to send event to {}: {}", destination, error)
            }
        }
    }
}

impl std::error::Error for CheckError {}

impl From<SpawnError> for CheckError {
    fn from(error: SpawnError) -> Self {
        CheckError::Spawn(error)
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(error: serde_json::Error) -> Self {
        CheckError::Serialize(error)
    }
}
