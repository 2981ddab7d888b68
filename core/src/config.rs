//! Check configuration — the fully parsed inputs for one run.
//!
//! The pipeline consumes a `CheckConfig`; it never parses arguments itself.
//! The CLI parser in `cli::parse` is the production producer, but any
//! frontend can construct one (the struct round-trips through JSON).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default destination for the event datagram: the Sensu client socket on
/// the local agent.
pub const DEFAULT_SOCKET: &str = "127.0.0.1:3030";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckConfig {
    /// Shell command line to execute. Required, non-empty.
    pub command: String,
    /// Check name; also becomes the event's `name` (and `command`) field.
    pub name: String,
    /// Downstream routing hint for the event pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    /// Time-to-live for the event's validity, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    /// Overrides the reporting source identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Pass the raw exit code through as the event status. When false
    /// (legacy checks), any failure collapses to status 2.
    #[serde(default)]
    pub nagios: bool,
    /// Print the event to stdout instead of sending it.
    #[serde(default)]
    pub dry_run: bool,
    /// Raw `key => value` fragments merged into the event, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<String>,
    /// Optional JSON object file whose members seed the event before the
    /// base fields are written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_file: Option<PathBuf>,
    /// UDP destination for the event datagram.
    #[serde(default = "default_socket")]
    pub socket: String,
}

fn default_socket() -> String {
    DEFAULT_SOCKET.to_string()
}

impl CheckConfig {
    /// A config for the given command and check name with everything else
    /// defaulted.
    pub fn new(command: &str, name: &str) -> Self {
        CheckConfig {
            command: command.to_string(),
            name: name.to_string(),
            handler: None,
            ttl: None,
            source: None,
            nagios: false,
            dry_run: false,
            extra: Vec::new(),
            json_file: None,
            socket: default_socket(),
        }
    }
}
