//! Tri-color LED arbitration — battery, notification and attention share one LED.
//!
//! The three logical lights are stored in a [`LightBoard`]. Every update
//! recomputes the physical output from all three: the LED is forced off,
//! the highest-priority lit state is picked (attention, then notification,
//! then battery), and that one state is written as either a blink pattern
//! or a steady 0–48 brightness per channel.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::color::{Rgb, is_lit, scale_channel};
use crate::error::{Result, TrilightError};
use crate::paths::EndpointPaths;
use crate::port::DevicePort;
use crate::state::{Channel, FlashMode, LightState};

/// Wait between forcing the LED off and enabling blink.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(20);

/// What the tri-color LED is physically told to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LedOutput {
    /// Hardware blink enabled per channel.
    Blink { red: bool, green: bool, blue: bool },
    /// Steady brightness per channel, 0–48.
    Solid { red: u8, green: u8, blue: u8 },
}

impl LedOutput {
    pub const OFF: LedOutput = LedOutput::Solid {
        red: 0,
        green: 0,
        blue: 0,
    };

    pub fn is_off(&self) -> bool {
        *self == LedOutput::OFF
    }
}

/// Flash mode and color after the on/off duration special cases.
///
/// - no duration at all: steady
/// - on-time only: steady, color kept
/// - no on-time: steady, color cleared
pub fn effective_flash(state: &LightState) -> (FlashMode, u32) {
    let on = state.flash_on_ms;
    let off = state.flash_off_ms;
    let mut mode = state.flash_mode;
    let mut color = state.color;

    if on == 0 && off == 0 {
        mode = FlashMode::None;
    }
    if mode != FlashMode::None {
        if on > 0 && off == 0 {
            mode = FlashMode::None;
        } else if on == 0 {
            mode = FlashMode::None;
            color = 0;
        }
    }
    (mode, color)
}

/// The physical output a single light state maps to.
///
/// A zero color never blinks: it resolves to solid off whatever the flash mode.
pub fn resolve_output(state: &LightState) -> LedOutput {
    let (mode, color) = effective_flash(state);
    let rgb = Rgb::from_color(color);

    if mode != FlashMode::None && color != 0 {
        let on = |v: u8| if v > 127 { 255 } else { 0 };
        let mut quantized = Rgb {
            red: on(rgb.red),
            green: on(rgb.green),
            blue: on(rgb.blue),
        };
        if quantized.is_dark() {
            quantized = Rgb::WHITE;
        }
        LedOutput::Blink {
            red: quantized.red > 0,
            green: quantized.green > 0,
            blue: quantized.blue > 0,
        }
    } else {
        LedOutput::Solid {
            red: scale_channel(rgb.red),
            green: scale_channel(rgb.green),
            blue: scale_channel(rgb.blue),
        }
    }
}

/// Best-effort write sequence: every write is attempted, the first failure
/// is kept for the caller.
struct WriteSequence<'a, P: DevicePort> {
    port: &'a P,
    first_err: Option<TrilightError>,
}

impl<'a, P: DevicePort> WriteSequence<'a, P> {
    fn new(port: &'a P) -> Self {
        WriteSequence {
            port,
            first_err: None,
        }
    }

    fn write(&mut self, path: &Path, value: i32) {
        if let Err(e) = self.port.write_int(path, value) {
            log::debug!("tri-color write skipped: {e}");
            self.first_err.get_or_insert(e);
        }
    }

    fn write_rgb(&mut self, paths: [&Path; 3], values: [i32; 3]) {
        for (path, value) in paths.into_iter().zip(values) {
            self.write(path, value);
        }
    }

    fn finish(self) -> Result<()> {
        match self.first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Stored state of the three lights sharing the tri-color LED.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LightBoard {
    pub battery: LightState,
    pub notification: LightState,
    pub attention: LightState,
}

impl LightBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored state for a tri-color channel; `None` for backlight/buttons.
    #[cfg(test)]
    pub fn state(&self, channel: Channel) -> Option<LightState> {
        match channel {
            Channel::Battery => Some(self.battery),
            Channel::Notifications => Some(self.notification),
            Channel::Attention => Some(self.attention),
            Channel::Backlight | Channel::Buttons => None,
        }
    }

    /// Replace the stored state of a tri-color channel.
    pub fn store(&mut self, channel: Channel, state: LightState) -> Result<()> {
        let slot = match channel {
            Channel::Battery => &mut self.battery,
            Channel::Notifications => &mut self.notification,
            Channel::Attention => &mut self.attention,
            Channel::Backlight | Channel::Buttons => {
                return Err(TrilightError::InvalidArgument(format!(
                    "{channel} does not use the tri-color LED"
                )));
            }
        };
        *slot = state;
        Ok(())
    }

    /// The channel shown on the LED and its state.
    ///
    /// Battery is the fallback and wins even when it is dark.
    pub fn winner(&self) -> (Channel, LightState) {
        if is_lit(&self.attention) {
            (Channel::Attention, self.attention)
        } else if is_lit(&self.notification) {
            (Channel::Notifications, self.notification)
        } else {
            (Channel::Battery, self.battery)
        }
    }

    /// Output the LED shows for the current board.
    pub fn output(&self) -> LedOutput {
        resolve_output(&self.winner().1)
    }

    /// Drive the LED from the full board.
    ///
    /// The LED is always forced off first. Each endpoint write is independent:
    /// a failing file does not stop the rest of the sequence, and the first
    /// failure is returned once everything has been attempted.
    pub fn recompute(
        &self,
        port: &impl DevicePort,
        paths: &EndpointPaths,
        settle: Duration,
    ) -> Result<LedOutput> {
        let mut seq = WriteSequence::new(port);
        seq.write_rgb(paths.blink(), [0; 3]);
        seq.write_rgb(paths.brightness(), [0; 3]);

        let (channel, state) = self.winner();
        let output = resolve_output(&state);
        log::debug!(
            "tri-color <- {channel}: mode {}, color {:#010X}, flash on {} off {} => {output:?}",
            state.flash_mode,
            state.color,
            state.flash_on_ms,
            state.flash_off_ms,
        );

        match output {
            LedOutput::Blink { red, green, blue } => {
                std::thread::sleep(settle);
                seq.write_rgb(
                    paths.blink(),
                    [i32::from(red), i32::from(green), i32::from(blue)],
                );
            }
            LedOutput::Solid { red, green, blue } => {
                seq.write_rgb(
                    paths.brightness(),
                    [i32::from(red), i32::from(green), i32::from(blue)],
                );
            }
        }
        seq.finish().map(|()| output)
    }
}
