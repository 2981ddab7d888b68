//! checkwrap core — the check-running pipeline.
//!
//! One invocation runs one external check command, translates its exit
//! status, assembles a JSON monitoring event, and either prints it (dry
//! run) or sends it as a single UDP datagram to a local Sensu-style client
//! socket. The flow is Runner → Event Builder → Transport; see `pipeline`.

pub mod cli;
pub mod config;
pub mod errors;
pub mod event;
pub mod fields;
pub mod pipeline;
pub mod runner;
pub mod transport;

pub use config::CheckConfig;
pub use errors::CheckError;
pub use runner::{CommandResult, CommandRunner, MockRunner, ShellRunner};
