//! CLI subcommands — set lights, preview arbitration, read back endpoints.

mod config_cmd;
mod preview;
mod read;
mod serve;
mod set;
mod status;

use std::path::Path;

use clap::{Args, Subcommand};
use serde::Serialize;

pub(super) use crate::RUNNING;
pub(super) use trilight_lib::arbiter::{self, LedOutput};
pub(super) use trilight_lib::color;
pub(super) use trilight_lib::config::Config;
pub(super) use trilight_lib::error::Result;
pub(super) use trilight_lib::paths::{Endpoint, EndpointPaths};
pub(super) use trilight_lib::port::SysfsPort;
pub(super) use trilight_lib::registry::BoardSnapshot;
pub(super) use trilight_lib::{Channel, FlashMode, LightState, Lights, TrilightError};

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

/// Pretty-print `value` as JSON on stdout.
pub(super) fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| TrilightError::Config(format!("JSON serialization failed: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Human-readable form of an LED output, e.g. `solid 48,24,0` or `blink red+blue`.
pub(super) fn describe_output(output: &LedOutput) -> String {
    match *output {
        LedOutput::Solid { red, green, blue } => {
            if output.is_off() {
                "off".to_string()
            } else {
                format!("solid {red},{green},{blue}")
            }
        }
        LedOutput::Blink { red, green, blue } => {
            let names: Vec<&str> = [(red, "red"), (green, "green"), (blue, "blue")]
                .into_iter()
                .filter_map(|(on, name)| on.then_some(name))
                .collect();
            format!("blink {}", names.join("+"))
        }
    }
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct SetOutput {
    pub channel: Channel,
    pub state: LightState,
    /// Tri-color view after the update; absent for backlight/buttons.
    pub led: Option<BoardSnapshot>,
}

#[derive(Serialize)]
pub(super) struct PreviewOutput {
    pub state: LightState,
    pub effective_flash: FlashMode,
    pub effective_color: String,
    pub output: LedOutput,
}

#[derive(Serialize)]
pub(super) struct EndpointJson {
    pub endpoint: String,
    pub path: String,
    pub value: Option<i32>,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub(super) struct StatusOutput {
    pub version: String,
    pub endpoints: Vec<EndpointJson>,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub problems: Vec<String>,
    pub endpoints: EndpointPaths,
}

/// Light state options shared by `set` and `preview`.
#[derive(Args, Debug, Clone)]
pub struct StateArgs {
    /// Color: #RRGGBB, #AARRGGBB or a name (red, green, blue, white, amber, off, ...)
    pub color: String,
    /// Flash mode: none, timed or hardware (default: timed if a duration is given)
    #[arg(long)]
    pub flash: Option<String>,
    /// Flash on-time in milliseconds
    #[arg(long, default_value_t = 0)]
    pub on_ms: u32,
    /// Flash off-time in milliseconds
    #[arg(long, default_value_t = 0)]
    pub off_ms: u32,
}

impl StateArgs {
    pub(super) fn to_state(&self) -> Result<LightState> {
        build_state(&self.color, self.flash.as_deref(), self.on_ms, self.off_ms)
    }
}

/// Build a light state from command-line style parts.
pub(super) fn build_state(
    color: &str,
    flash: Option<&str>,
    on_ms: u32,
    off_ms: u32,
) -> Result<LightState> {
    let color = color::parse_color(color)?;
    let flash_mode = match flash {
        Some(mode) => mode.parse()?,
        None if on_ms > 0 || off_ms > 0 => FlashMode::Timed,
        None => FlashMode::None,
    };
    Ok(LightState {
        color,
        flash_mode,
        flash_on_ms: on_ms,
        flash_off_ms: off_ms,
        ..LightState::default()
    })
}

/// Load the config from `custom_path` or the default location, logging
/// parse warnings and validation problems.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    let (config, warnings) = match custom_path {
        Some(p) => Config::load_from(p),
        None => Config::load_with_warnings(),
    };
    for w in &warnings {
        log::warn!("{w}");
    }
    if let Err(errors) = config.validate() {
        for e in &errors {
            log::warn!("[config] {e}");
        }
    }
    config
}

pub(super) fn open_lights(config: &Config) -> Lights<SysfsPort> {
    Lights::from_config(SysfsPort::new(), config)
}

#[derive(Subcommand)]
pub enum Command {
    /// Set one light (backlight, battery, notifications, attention, buttons)
    Set {
        /// Light name
        channel: String,
        #[command(flatten)]
        state: StateArgs,
    },

    /// Show what the tri-color LED would do for a state (no hardware required)
    Preview {
        #[command(flatten)]
        state: StateArgs,
    },

    /// Read the current value of one endpoint
    Read {
        /// Endpoint: red, green, blue, red-blink, green-blink, blue-blink, backlight, buttons
        endpoint: String,
    },

    /// Read every endpoint
    Status,

    /// Turn the tri-color LED off
    Off,

    /// Apply light updates read from stdin, one per line, until EOF or Ctrl+C
    Serve,

    /// Show current configuration and endpoint paths
    Config {
        /// Write a config file with the default settings (refuses to overwrite)
        #[arg(long)]
        init: bool,
    },
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, json: bool, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        Command::Set { channel, state } => set::cmd_set(&channel, &state, json, config_path),
        Command::Preview { state } => preview::cmd_preview(&state, json),
        Command::Read { endpoint } => read::cmd_read(&endpoint, json, config_path),
        Command::Status => status::cmd_status(json, config_path),
        Command::Off => {
            if json {
                warn_json_unsupported("off");
            }
            set::cmd_off(config_path)
        }
        Command::Serve => {
            if json {
                warn_json_unsupported("serve");
            }
            serve::cmd_serve(config_path)
        }
        Command::Config { init: true } => {
            if json {
                warn_json_unsupported("config --init");
            }
            config_cmd::cmd_config_init(config_path)
        }
        Command::Config { init: false } => config_cmd::cmd_config(json, config_path),
    }
}



#[cfg(test)]
mod json_struct_tests {
    use super::*;

    #[test]
    fn preview_output_fields() {
        let output = PreviewOutput {
            state: LightState::flashing(0xFFFF_0000, 500, 500),
            effective_flash: FlashMode::Timed,
            effective_color: "#FF0000".into(),
            output: LedOutput::Blink {
                red: true,
                green: false,
                blue: false,
            },
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["effective_flash"], "timed");
        assert_eq!(json["output"]["mode"], "blink");
        assert_eq!(json["output"]["red"], true);
        assert_eq!(json["state"]["flash_on_ms"], 500);
    }

    #[test]
    fn endpoint_json_with_error() {
        let e = EndpointJson {
            endpoint: "red".into(),
            path: "/sys/class/leds/red/brightness".into(),
            value: None,
            error: Some("missing".into()),
        };
        let json = serde_json::to_value(&e).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(json["value"].is_null());
    }

    #[test]
    fn set_output_single_channel_has_null_led() {
        let out = SetOutput {
            channel: Channel::Buttons,
            state: LightState::solid(0x40),
            led: None,
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["channel"], "buttons");
        assert!(json["led"].is_null());
    }
}
