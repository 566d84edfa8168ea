//! Control endpoint locations.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::error::TrilightError;

pub const RED_LED_FILE: &str = "/sys/class/leds/red/brightness";
pub const GREEN_LED_FILE: &str = "/sys/class/leds/green/brightness";
pub const BLUE_LED_FILE: &str = "/sys/class/leds/blue/brightness";

pub const RED_BLINK_FILE: &str = "/sys/class/leds/red/blink";
pub const GREEN_BLINK_FILE: &str = "/sys/class/leds/green/blink";
pub const BLUE_BLINK_FILE: &str = "/sys/class/leds/blue/blink";

pub const LCD_FILE: &str = "/sys/class/backlight/lcd-backlight/brightness";
pub const BUTTON_FILE: &str = "/sys/class/leds/button-backlight/brightness";

/// Every control file the lights touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointPaths {
    pub red: PathBuf,
    pub green: PathBuf,
    pub blue: PathBuf,
    pub red_blink: PathBuf,
    pub green_blink: PathBuf,
    pub blue_blink: PathBuf,
    pub backlight: PathBuf,
    pub buttons: PathBuf,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        EndpointPaths {
            red: RED_LED_FILE.into(),
            green: GREEN_LED_FILE.into(),
            blue: BLUE_LED_FILE.into(),
            red_blink: RED_BLINK_FILE.into(),
            green_blink: GREEN_BLINK_FILE.into(),
            blue_blink: BLUE_BLINK_FILE.into(),
            backlight: LCD_FILE.into(),
            buttons: BUTTON_FILE.into(),
        }
    }
}

impl EndpointPaths {
    /// The default layout re-rooted under `root`, e.g. a fake sysfs tree.
    pub fn under(root: &Path) -> Self {
        let reroot = |p: &str| root.join(p.trim_start_matches('/'));
        EndpointPaths {
            red: reroot(RED_LED_FILE),
            green: reroot(GREEN_LED_FILE),
            blue: reroot(BLUE_LED_FILE),
            red_blink: reroot(RED_BLINK_FILE),
            green_blink: reroot(GREEN_BLINK_FILE),
            blue_blink: reroot(BLUE_BLINK_FILE),
            backlight: reroot(LCD_FILE),
            buttons: reroot(BUTTON_FILE),
        }
    }

    pub fn get(&self, endpoint: Endpoint) -> &Path {
        match endpoint {
            Endpoint::Red => &self.red,
            Endpoint::Green => &self.green,
            Endpoint::Blue => &self.blue,
            Endpoint::RedBlink => &self.red_blink,
            Endpoint::GreenBlink => &self.green_blink,
            Endpoint::BlueBlink => &self.blue_blink,
            Endpoint::Backlight => &self.backlight,
            Endpoint::Buttons => &self.buttons,
        }
    }

    pub(crate) fn get_mut(&mut self, endpoint: Endpoint) -> &mut PathBuf {
        match endpoint {
            Endpoint::Red => &mut self.red,
            Endpoint::Green => &mut self.green,
            Endpoint::Blue => &mut self.blue,
            Endpoint::RedBlink => &mut self.red_blink,
            Endpoint::GreenBlink => &mut self.green_blink,
            Endpoint::BlueBlink => &mut self.blue_blink,
            Endpoint::Backlight => &mut self.backlight,
            Endpoint::Buttons => &mut self.buttons,
        }
    }

    /// Brightness files in red, green, blue order.
    pub fn brightness(&self) -> [&Path; 3] {
        [&self.red, &self.green, &self.blue]
    }

    /// Blink files in red, green, blue order.
    pub fn blink(&self) -> [&Path; 3] {
        [&self.red_blink, &self.green_blink, &self.blue_blink]
    }
}

/// Names one control file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Red,
    Green,
    Blue,
    RedBlink,
    GreenBlink,
    BlueBlink,
    Backlight,
    Buttons,
}

impl Endpoint {
    pub const ALL: [Endpoint; 8] = [
        Endpoint::Red,
        Endpoint::Green,
        Endpoint::Blue,
        Endpoint::RedBlink,
        Endpoint::GreenBlink,
        Endpoint::BlueBlink,
        Endpoint::Backlight,
        Endpoint::Buttons,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Red => "red",
            Endpoint::Green => "green",
            Endpoint::Blue => "blue",
            Endpoint::RedBlink => "red-blink",
            Endpoint::GreenBlink => "green-blink",
            Endpoint::BlueBlink => "blue-blink",
            Endpoint::Backlight => "backlight",
            Endpoint::Buttons => "buttons",
        }
    }

    /// Key used for this endpoint in the config `[paths]` table.
    pub fn config_key(self) -> &'static str {
        match self {
            Endpoint::RedBlink => "red_blink",
            Endpoint::GreenBlink => "green_blink",
            Endpoint::BlueBlink => "blue_blink",
            other => other.name(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = TrilightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Endpoint::ALL
            .into_iter()
            .find(|e| e.name() == s || e.config_key() == s)
            .ok_or_else(|| TrilightError::InvalidArgument(format!("unknown endpoint: {s}")))
    }
}
