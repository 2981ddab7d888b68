//! CLI argument parsing for the `checkwrap` binary.
//!
//! Arguments are expected WITHOUT the program name (i.e. `args` should be
//! `["-n", "disk", "check_disk"]`, not `["checkwrap", ...]`).
//!
//! The check command itself may be given either with `--command` or as the
//! trailing positional arguments, which are joined with spaces. `--` ends
//! flag parsing so commands starting with a dash can be passed.

use std::path::PathBuf;

use crate::config::CheckConfig;

/// Usage text printed by `checkwrap --help`.
pub fn usage() -> &'static str {
    "Usage: checkwrap --name <name> [options] [--] <command...>

Run a check command and send the result to a local Sensu client socket.

Options:
  -n, --name <name>        Name of the check (required)
  -c, --command <command>  Command to run (or pass it as trailing arguments)
  -H, --handler <handler>  Handler for the event
  -t, --ttl <seconds>      TTL for the event
  -s, --source <source>    Source of the event
  -e, --extra <fragment>   Extra event field, e.g. \"occurrences => 3\" (repeatable)
  -f, --json-file <path>   JSON object file merged under the base fields
      --socket <addr>      Destination socket (default 127.0.0.1:3030)
      --nagios             Pass the raw exit code through as the status
  -d, --dry-run            Print the event to stdout instead of sending it
  -h, --help               Show this help"
}

/// Outcome of argument parsing: either a runnable configuration or a help
/// request. Help is only recognized while scanning flags, so `-h` after
/// `--` stays part of the check command.
#[derive(Debug, PartialEq)]
pub enum ParsedArgs {
    Run(CheckConfig),
    Help,
}

/// Parse CLI arguments into a `CheckConfig` (or a help request).
pub fn parse_args(args: &[&str]) -> Result<ParsedArgs, String> {
    let mut name = None;
    let mut command = None;
    let mut handler = None;
    let mut ttl = None;
    let mut source = None;
    let mut nagios = false;
    let mut dry_run = false;
    let mut extra = Vec::new();
    let mut json_file = None;
    let mut socket = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--name" | "-n" => {
                i += 1;
                name = Some(take_arg(args, i, "--name")?);
            }
            "--command" | "-c" => {
                i += 1;
                command = Some(take_arg(args, i, "--command")?);
            }
            "--handler" | "-H" => {
                i += 1;
                handler = Some(take_arg(args, i, "--handler")?);
            }
            "--ttl" | "-t" => {
                i += 1;
                let raw = take_arg(args, i, "--ttl")?;
                ttl = Some(
                    raw.parse::<u64>()
                        .map_err(|_| format!("Invalid value for --ttl: '{}'", raw))?,
                );
            }
            "--source" | "-s" => {
                i += 1;
                source = Some(take_arg(args, i, "--source")?);
            }
            "--extra" | "-e" => {
                i += 1;
                extra.push(take_arg(args, i, "--extra")?);
            }
            "--json-file" | "-f" => {
                i += 1;
                json_file = Some(PathBuf::from(take_arg(args, i, "--json-file")?));
            }
            "--socket" => {
                i += 1;
                socket = Some(take_arg(args, i, "--socket")?);
            }
            "--nagios" => nagios = true,
            "--dry-run" | "-d" => dry_run = true,
            "--help" | "-h" => return Ok(ParsedArgs::Help),
            "--" => {
                positional.extend(args[i + 1..].iter().map(|s| s.to_string()));
                break;
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("Unknown flag: '{}'", flag));
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let name = name.ok_or("No check name specified. Run 'checkwrap --help' for usage.")?;

    let command = match command {
        Some(c) if !positional.is_empty() => {
            return Err(format!(
                "Command given both via --command ('{}') and as trailing arguments",
                c
            ));
        }
        Some(c) => c,
        None if positional.is_empty() => {
            return Err("No command specified. Run 'checkwrap --help' for usage.".into());
        }
        None => positional.join(" "),
    };
    if command.trim().is_empty() {
        return Err("Command must not be empty".into());
    }

    let mut config = CheckConfig::new(&command, &name);
    config.handler = handler;
    config.ttl = ttl;
    config.source = source;
    config.nagios = nagios;
    config.dry_run = dry_run;
    config.extra = extra;
    config.json_file = json_file;
    if let Some(socket) = socket {
        config.socket = socket;
    }
    Ok(ParsedArgs::Run(config))
}

/// Fetch the value for a flag, failing if the argument list ended or the
/// next argument is itself a flag.
fn take_arg(args: &[&str], index: usize, flag: &str) -> Result<String, String> {
    match args.get(index) {
        Some(value) if value.starts_with("--") => Err(format!(
            "Missing value for {} (got flag '{}')",
            flag, value
        )),
        Some(value) => Ok(value.to_string()),
        None => Err(format!("Missing value for {}", flag)),
    }
}
