//! `serve` subcommand — apply light updates from stdin through one registry.
//!
//! Each line is `<light> <color> [flash] [on_ms] [off_ms]`. Blank lines and
//! lines starting with `#` are skipped. Bad lines and failed writes are
//! logged and the loop carries on.

use std::io::BufRead;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use super::{
    Channel, LightState, RUNNING, Result, TrilightError, build_state, describe_output,
    load_config, open_lights,
};

/// How often the loop checks the Ctrl+C flag while stdin is idle.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Parse one input line. `Ok(None)` for blank and comment lines.
fn parse_line(line: &str) -> Result<Option<(Channel, LightState)>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 2 || fields.len() > 5 {
        return Err(TrilightError::InvalidArgument(format!(
            "expected `<light> <color> [flash] [on_ms] [off_ms]`, got: {line}"
        )));
    }

    let channel: Channel = fields[0].parse()?;
    let ms = |idx: usize| -> Result<u32> {
        match fields.get(idx) {
            Some(v) => v.parse().map_err(|_| {
                TrilightError::InvalidArgument(format!("invalid duration: {v}"))
            }),
            None => Ok(0),
        }
    };
    let state = build_state(fields[1], fields.get(2).copied(), ms(3)?, ms(4)?)?;
    Ok(Some((channel, state)))
}

pub(super) fn cmd_serve(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let lights = open_lights(&config);

    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    log::debug!("serving light updates from stdin");

    while RUNNING.load(Ordering::SeqCst) {
        let line = match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let (channel, state) = match parse_line(&line) {
            Ok(Some(update)) => update,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("[serve] {e}");
                continue;
            }
        };

        if let Err(e) = lights.set_light(channel, &state) {
            log::warn!("[serve] {channel}: {e}");
        }
        if channel.is_tricolor() {
            let snap = lights.snapshot();
            println!(
                "[{channel}] LED: {} ({})",
                describe_output(&snap.output),
                snap.active
            );
        } else {
            println!("[{channel}] updated");
        }
    }

    lights.turn_off()?;
    println!("LED off");
    Ok(())
}
