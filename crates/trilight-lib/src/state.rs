//! Light state snapshots and channel names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TrilightError;

/// How a light should flash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    None,
    /// Software-requested on/off timing.
    Timed,
    /// Hardware-driven blinking.
    Hardware,
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashMode::None => write!(f, "none"),
            FlashMode::Timed => write!(f, "timed"),
            FlashMode::Hardware => write!(f, "hardware"),
        }
    }
}

impl FromStr for FlashMode {
    type Err = TrilightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(FlashMode::None),
            "timed" => Ok(FlashMode::Timed),
            "hardware" => Ok(FlashMode::Hardware),
            other => Err(TrilightError::InvalidArgument(format!(
                "unknown flash mode: {other} (expected none, timed or hardware)"
            ))),
        }
    }
}

/// Brightness source requested by the caller. Carried but not acted on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrightnessMode {
    #[default]
    User,
    Sensor,
}

/// One requested light state.
///
/// `color` is `0xAARRGGBB`; the alpha byte is ignored by everything that
/// decides whether a light is lit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    pub color: u32,
    pub flash_mode: FlashMode,
    pub flash_on_ms: u32,
    pub flash_off_ms: u32,
    pub brightness_mode: BrightnessMode,
}

impl LightState {
    /// A steady light of the given color.
    pub fn solid(color: u32) -> Self {
        LightState {
            color,
            ..LightState::default()
        }
    }

    /// A timed flash of the given color.
    pub fn flashing(color: u32, on_ms: u32, off_ms: u32) -> Self {
        LightState {
            color,
            flash_mode: FlashMode::Timed,
            flash_on_ms: on_ms,
            flash_off_ms: off_ms,
            brightness_mode: BrightnessMode::User,
        }
    }
}

/// A named logical light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Backlight,
    Battery,
    Notifications,
    Attention,
    Buttons,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Backlight,
        Channel::Battery,
        Channel::Notifications,
        Channel::Attention,
        Channel::Buttons,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Channel::Backlight => "backlight",
            Channel::Battery => "battery",
            Channel::Notifications => "notifications",
            Channel::Attention => "attention",
            Channel::Buttons => "buttons",
        }
    }

    /// Whether this channel shares the tri-color LED.
    pub fn is_tricolor(self) -> bool {
        matches!(
            self,
            Channel::Battery | Channel::Notifications | Channel::Attention
        )
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channel {
    type Err = TrilightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| TrilightError::InvalidArgument(format!("unknown light: {s}")))
    }
}
