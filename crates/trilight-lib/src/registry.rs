//! Named light channels — open, set, close.
//!
//! [`Lights`] owns the endpoint port and the stored tri-color state. One
//! mutex guards both, so every write sequence runs to completion before the
//! next update starts and the LED files never see two updates interleaved.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

use crate::arbiter::{DEFAULT_SETTLE, LedOutput, LightBoard};
use crate::color::rgb_to_brightness;
use crate::config::Config;
use crate::error::Result;
use crate::paths::{Endpoint, EndpointPaths};
use crate::port::DevicePort;
use crate::state::{Channel, LightState};

/// Point-in-time view of the tri-color lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub battery: LightState,
    pub notifications: LightState,
    pub attention: LightState,
    /// Channel currently shown on the LED.
    pub active: Channel,
    pub output: LedOutput,
}

/// The light registry.
pub struct Lights<P: DevicePort> {
    port: P,
    paths: EndpointPaths,
    settle: Duration,
    board: Mutex<LightBoard>,
}

impl<P: DevicePort> Lights<P> {
    /// Registry with all tri-color lights off and the default settle wait.
    pub fn new(port: P, paths: EndpointPaths) -> Self {
        Lights {
            port,
            paths,
            settle: DEFAULT_SETTLE,
            board: Mutex::new(LightBoard::new()),
        }
    }

    pub fn from_config(port: P, config: &Config) -> Self {
        Self::new(port, config.endpoint_paths()).with_settle_delay(config.blink_settle())
    }

    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn paths(&self) -> &EndpointPaths {
        &self.paths
    }

    // The board is plain data that is rewritten wholesale, so a panic while
    // it was held cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, LightBoard> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a channel by name (`backlight`, `battery`, `notifications`,
    /// `attention`, `buttons`).
    pub fn open(&self, name: &str) -> Result<LightHandle<'_, P>> {
        let channel = name.parse::<Channel>()?;
        log::debug!("opened {channel}");
        Ok(LightHandle {
            lights: self,
            channel,
        })
    }

    /// Set one channel's state and update the hardware.
    pub fn set_light(&self, channel: Channel, state: &LightState) -> Result<()> {
        let mut board = self.lock();
        log::debug!("set {channel}: {state:?}");
        match channel {
            Channel::Backlight => {
                let brightness = rgb_to_brightness(state.color);
                self.port
                    .write_int(&self.paths.backlight, i32::from(brightness))
            }
            Channel::Buttons => self
                .port
                .write_int(&self.paths.buttons, (state.color & 0xFF) as i32),
            Channel::Battery | Channel::Notifications | Channel::Attention => {
                board.store(channel, *state)?;
                board
                    .recompute(&self.port, &self.paths, self.settle)
                    .map(|_| ())
            }
        }
    }

    /// Clear all three tri-color lights and drive the LED off.
    pub fn turn_off(&self) -> Result<()> {
        let mut board = self.lock();
        *board = LightBoard::new();
        board
            .recompute(&self.port, &self.paths, self.settle)
            .map(|_| ())
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let board = self.lock();
        BoardSnapshot {
            battery: board.battery,
            notifications: board.notification,
            attention: board.attention,
            active: board.winner().0,
            output: board.output(),
        }
    }

    /// Read one endpoint's current value.
    pub fn read(&self, endpoint: Endpoint) -> Result<i32> {
        let _board = self.lock();
        self.port.read_int(self.paths.get(endpoint))
    }

    /// Read every endpoint in one locked pass.
    pub fn read_all(&self) -> Vec<(Endpoint, Result<i32>)> {
        let _board = self.lock();
        Endpoint::ALL
            .into_iter()
            .map(|e| (e, self.port.read_int(self.paths.get(e))))
            .collect()
    }
}

/// An open channel.
///
/// Closing only drops the handle; the registry keeps the channel's last
/// state.
pub struct LightHandle<'a, P: DevicePort> {
    lights: &'a Lights<P>,
    channel: Channel,
}

impl<P: DevicePort> LightHandle<'_, P> {
    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn set_light(&self, state: &LightState) -> Result<()> {
        self.lights.set_light(self.channel, state)
    }

    pub fn close(self) {
        log::debug!("closed {}", self.channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrilightError;
    use crate::port::mock::MockPort;

    fn lights(port: &MockPort) -> Lights<&MockPort> {
        Lights::new(port, EndpointPaths::default()).with_settle_delay(Duration::ZERO)
    }

    // ── open / close ──

    #[test]
    fn open_known_channels() {
        let port = MockPort::new();
        let lights = lights(&port);
        for c in Channel::ALL {
            assert_eq!(lights.open(c.name()).unwrap().channel(), c);
        }
    }

    #[test]
    fn open_unknown_name_writes_nothing() {
        let port = MockPort::new();
        let lights = lights(&port);
        let err = lights.open("wifi").err().unwrap();
        assert!(matches!(err, TrilightError::InvalidArgument(_)));
        assert_eq!(err.code(), -22);
        assert!(port.writes.borrow().is_empty());
    }

    #[test]
    fn close_keeps_stored_state() {
        let port = MockPort::new();
        let lights = lights(&port);
        let handle = lights.open("notifications").unwrap();
        handle.set_light(&LightState::solid(0xFFFF_0000)).unwrap();
        handle.close();
        assert_eq!(lights.snapshot().notifications, LightState::solid(0xFFFF_0000));
        assert_eq!(lights.snapshot().active, Channel::Notifications);
    }

    // ── single-channel lights ──

    #[test]
    fn backlight_writes_luminance() {
        let port = MockPort::new();
        let lights = lights(&port);
        lights
            .set_light(Channel::Backlight, &LightState::solid(0xFFFF_FFFF))
            .unwrap();
        assert_eq!(
            port.take_writes(),
            vec![(EndpointPaths::default().backlight, 255)]
        );
    }

    #[test]
    fn buttons_write_low_byte() {
        let port = MockPort::new();
        let lights = lights(&port);
        lights
            .set_light(Channel::Buttons, &LightState::solid(0xFF12_34AB))
            .unwrap();
        assert_eq!(
            port.take_writes(),
            vec![(EndpointPaths::default().buttons, 0xAB)]
        );
    }

    #[test]
    fn single_channel_lights_do_not_touch_led() {
        let port = MockPort::new();
        let lights = lights(&port);
        lights
            .set_light(Channel::Backlight, &LightState::solid(0xFF80_8080))
            .unwrap();
        assert_eq!(lights.snapshot().battery, LightState::default());
        assert_eq!(port.writes.borrow().len(), 1);
    }

    #[test]
    fn backlight_failure_is_returned() {
        let port = MockPort::new();
        port.fail_path(EndpointPaths::default().backlight);
        let lights = lights(&port);
        let err = lights
            .set_light(Channel::Backlight, &LightState::solid(0xFFFF_FFFF))
            .unwrap_err();
        assert!(err.code() < 0);
    }

    // ── tri-color lights ──

    #[test]
    fn tricolor_set_recomputes() {
        let port = MockPort::new();
        let lights = lights(&port);
        lights
            .set_light(Channel::Battery, &LightState::solid(0xFF00_00FF))
            .unwrap();
        let p = EndpointPaths::default();
        assert_eq!(port.value(&p.blue), Some(48));
        assert_eq!(port.take_writes().len(), 9);
    }

    #[test]
    fn clearing_attention_falls_back_to_notification() {
        let port = MockPort::new();
        let lights = lights(&port);
        lights
            .set_light(Channel::Notifications, &LightState::solid(0xFFFF_0000))
            .unwrap();
        lights
            .set_light(Channel::Attention, &LightState::flashing(0xFF00_FF00, 500, 500))
            .unwrap();
        assert_eq!(lights.snapshot().active, Channel::Attention);

        lights
            .set_light(Channel::Attention, &LightState::default())
            .unwrap();
        let snap = lights.snapshot();
        assert_eq!(snap.active, Channel::Notifications);
        assert_eq!(
            snap.output,
            LedOutput::Solid {
                red: 48,
                green: 0,
                blue: 0
            }
        );
        let p = EndpointPaths::default();
        assert_eq!(port.value(&p.green_blink), Some(0));
        assert_eq!(port.value(&p.red), Some(48));
    }

    #[test]
    fn same_state_twice_same_writes() {
        let port = MockPort::new();
        let lights = lights(&port);
        let state = LightState::flashing(0xFFFF_FF00, 250, 750);
        lights.set_light(Channel::Notifications, &state).unwrap();
        let first = port.take_writes();
        lights.set_light(Channel::Notifications, &state).unwrap();
        assert_eq!(port.take_writes(), first);
    }

    #[test]
    fn turn_off_clears_every_channel() {
        let port = MockPort::new();
        let lights = lights(&port);
        lights
            .set_light(Channel::Attention, &LightState::solid(0xFFFF_FFFF))
            .unwrap();
        lights.turn_off().unwrap();
        let snap = lights.snapshot();
        assert_eq!(snap.attention, LightState::default());
        assert!(snap.output.is_off());
        assert_eq!(port.value(&EndpointPaths::default().red), Some(0));
    }

    // ── read-back ──

    #[test]
    fn read_endpoint() {
        let port = MockPort::new();
        port.set_value(EndpointPaths::default().buttons, 7);
        let lights = lights(&port);
        assert_eq!(lights.read(Endpoint::Buttons).unwrap(), 7);
        assert!(lights.read(Endpoint::Red).is_err());
    }

    #[test]
    fn read_all_reports_each_endpoint() {
        let port = MockPort::new();
        let lights = lights(&port);
        lights
            .set_light(Channel::Battery, &LightState::solid(0xFF00_FF00))
            .unwrap();
        let values = lights.read_all();
        assert_eq!(values.len(), Endpoint::ALL.len());
        let green = values
            .iter()
            .find(|(e, _)| *e == Endpoint::Green)
            .map(|(_, v)| v.as_ref().ok().copied());
        assert_eq!(green, Some(Some(48)));
        let backlight = values.iter().find(|(e, _)| *e == Endpoint::Backlight);
        assert!(backlight.unwrap().1.is_err());
    }

    #[test]
    fn from_config_keeps_minimum_blink_settle() {
        let port = MockPort::new();
        let config: Config = toml::from_str("blink_settle_ms = 0").unwrap();
        let lights = Lights::from_config(&port, &config);
        let start = std::time::Instant::now();
        lights
            .set_light(Channel::Attention, &LightState::flashing(0xFFFF_0000, 500, 500))
            .unwrap();
        assert!(start.elapsed() >= DEFAULT_SETTLE);
        assert_eq!(port.value(&EndpointPaths::default().red_blink), Some(1));
    }

    #[test]
    fn from_config_uses_settle_and_paths() {
        let port = MockPort::new();
        let config = Config {
            sysfs_root: "/tmp/board".into(),
            blink_settle_ms: 0,
            ..Config::default()
        };
        let lights = Lights::from_config(&port, &config);
        assert_eq!(lights.paths(), &config.endpoint_paths());
        lights
            .set_light(Channel::Buttons, &LightState::solid(0x10))
            .unwrap();
        assert_eq!(
            port.value(std::path::Path::new(
                "/tmp/board/sys/class/leds/button-backlight/brightness"
            )),
            Some(0x10)
        );
    }
}
