//! Delivery — prints the event (dry run) or sends it as one UDP datagram.
//!
//! The datagram is fire-and-forget: at most one attempt, no retry, no
//! buffering, no acknowledgment. A failed send is fatal so an event is
//! never lost silently.

use std::io::{self, Write};
use std::net::UdpSocket;

use serde_json::{Map, Value};

use crate::config::CheckConfig;
use crate::errors::CheckError;

/// Deliver the event according to the config: the given writer (stdout in
/// production) when `dry_run`, otherwise a single datagram to
/// `config.socket`. The writer is only touched in dry-run mode.
pub fn deliver(
    event: &Map<String, Value>,
    config: &CheckConfig,
    out: &mut impl Write,
) -> Result<(), CheckError> {
    let payload = serde_json::to_string(event)?;
    if config.dry_run {
        write_event(out, &payload).map_err(CheckError::Stdout)
    } else {
        send_datagram(&payload, &config.socket)
    }
}

/// Write the serialized event as a single newline-terminated line.
fn write_event(out: &mut impl Write, payload: &str) -> io::Result<()> {
    writeln!(out, "{}", payload)
}

/// Send the serialized event as one datagram from an ephemeral local port.
/// The socket is dropped as soon as the send returns, success or not.
fn send_datagram(payload: &str, destination: &str) -> Result<(), CheckError> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).map_err(|error| CheckError::Transport {
        destination: destination.to_string(),
        error,
    })?;
    socket
        .send_to(payload.as_bytes(), destination)
        .map_err(|error| CheckError::Transport {
            destination: destination.to_string(),
            error,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn sample_event() -> Map<String, Value> {
        let mut event = Map::new();
        event.insert("name".into(), json!("disk"));
        event.insert("status".into(), json!(0));
        event
    }

    #[test]
    fn write_event_is_single_newline_terminated_line() {
        let mut out = Vec::new();
        write_event(&mut out, r#"{"name":"disk","status":0}"#).unwrap();
        assert_eq!(out, b"{\"name\":\"disk\",\"status\":0}\n");
    }

    #[test]
    fn send_datagram_delivers_payload_verbatim() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let destination = receiver.local_addr().unwrap().to_string();

        let payload = serde_json::to_string(&sample_event()).unwrap();
        send_datagram(&payload, &destination).unwrap();

        let mut buf = [0u8; 2048];
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], payload.as_bytes());
    }

    #[test]
    fn datagram_round_trips_as_json() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();

        let mut config = CheckConfig::new("exit 0", "disk");
        config.socket = receiver.local_addr().unwrap().to_string();
        let mut out = Vec::new();
        deliver(&sample_event(), &config, &mut out).unwrap();

        let mut buf = [0u8; 2048];
        let (len, _) = receiver.recv_from(&mut buf).unwrap();
        let back: Map<String, Value> = serde_json::from_slice(&buf[..len]).unwrap();
        assert_eq!(back, sample_event());
    }

    #[test]
    fn network_mode_writes_nothing_to_the_stdout_path() {
        let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
        let mut config = CheckConfig::new("exit 0", "disk");
        config.socket = receiver.local_addr().unwrap().to_string();

        let mut out = Vec::new();
        deliver(&sample_event(), &config, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn dry_run_writes_the_event_and_needs_no_listener() {
        let mut config = CheckConfig::new("exit 0", "disk");
        config.dry_run = true;
        // Point at a destination nothing listens on; dry run must not care.
        config.socket = "127.0.0.1:1".into();

        let mut out = Vec::new();
        deliver(&sample_event(), &config, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let back: Map<String, Value> = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(back, sample_event());
    }

    #[test]
    fn unresolvable_destination_is_a_transport_error() {
        let err = send_datagram("{}", "not-a-real-host.invalid:3030").unwrap_err();
        assert!(matches!(err, CheckError::Transport { .. }));
    }
}
