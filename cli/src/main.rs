//! checkwrap — run a check command and report the result to a local
//! Sensu-style client socket.
//!
//! # Usage
//!
//! ```text
//! checkwrap --name disk --dry-run -- df -h /
//! checkwrap -n web --ttl 120 -H default -c "curl -sf http://localhost/"
//! checkwrap -n load --nagios -e "occurrences => 3" check_load -w 5 -c 10
//! ```
//!
//! Exit codes: 0 when the pipeline completed (regardless of the check's
//! own status), 2 on an argument error, 1 on any fatal pipeline error
//! (spawn failure, malformed extra field, failed send).

use std::process;

use checkwrap_core::cli::parse::{parse_args, usage, ParsedArgs};
use checkwrap_core::pipeline;
use checkwrap_core::runner::ShellRunner;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let arg_refs: Vec<&str> = args[1..].iter().map(|s| s.as_str()).collect();

    let config = match parse_args(&arg_refs) {
        Ok(ParsedArgs::Run(c)) => c,
        Ok(ParsedArgs::Help) => {
            println!("{}", usage());
            return;
        }
        Err(e) => {
            eprintln!("checkwrap: {}", e);
            process::exit(2);
        }
    };

    if let Err(e) = pipeline::run(&config, &ShellRunner) {
        eprintln!("checkwrap: {}", e);
        process::exit(1);
    }
}
