//! Color conversion for the indicator LEDs.
//!
//! Colors are `0xAARRGGBB`. The alpha byte never affects what is shown.

use crate::state::LightState;

/// Highest value the tri-color brightness endpoints accept.
pub const MAX_CHANNEL_LEVEL: u8 = 48;

const RGB_MASK: u32 = 0x00FF_FFFF;

/// A color split into its 8-bit channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        red: 255,
        green: 255,
        blue: 255,
    };

    pub fn from_color(color: u32) -> Self {
        Rgb {
            red: ((color >> 16) & 0xFF) as u8,
            green: ((color >> 8) & 0xFF) as u8,
            blue: (color & 0xFF) as u8,
        }
    }

    pub fn is_dark(self) -> bool {
        self.red == 0 && self.green == 0 && self.blue == 0
    }
}

/// Perceptual luminance of a color, 0–255.
///
/// Fixed-point 0.299/0.587/0.114 weights scaled to 256.
pub fn rgb_to_brightness(color: u32) -> u8 {
    let Rgb { red, green, blue } = Rgb::from_color(color);
    ((77 * u32::from(red) + 150 * u32::from(green) + 29 * u32::from(blue)) >> 8) as u8
}

/// Rescale an 8-bit channel to the 0–48 range of the LED brightness files.
pub fn scale_channel(value: u8) -> u8 {
    (f32::from(value) / 255.0 * f32::from(MAX_CHANNEL_LEVEL)) as u8
}

/// Whether the state asks for any light at all (alpha ignored).
pub fn is_lit(state: &LightState) -> bool {
    state.color & RGB_MASK != 0
}

/// Parse a color string into `0xAARRGGBB`.
///
/// Accepts:
/// - Hex: `"#FF0000"`, `"FF0000"` (alpha set to `FF`), `"#80FF0000"` (alpha kept)
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"orange"`, `"amber"`,
///   `"yellow"`, `"purple"`, `"cyan"`, and `"off"`/`"black"`
pub fn parse_color(s: &str) -> crate::error::Result<u32> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(0xFFFF_0000),
        "green" => return Ok(0xFF00_FF00),
        "blue" => return Ok(0xFF00_00FF),
        "white" => return Ok(0xFFFF_FFFF),
        "orange" => return Ok(0xFFFF_8000),
        "amber" => return Ok(0xFFFF_BF00),
        "yellow" => return Ok(0xFFFF_FF00),
        "purple" => return Ok(0xFF80_00FF),
        "cyan" => return Ok(0xFF00_FFFF),
        "off" | "black" => return Ok(0x0000_0000),
        _ => {}
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 && hex.len() != 8 {
        return Err(crate::TrilightError::Color(format!(
            "Invalid color: {s} (use #RRGGBB, #AARRGGBB or a color name)"
        )));
    }
    let val = u32::from_str_radix(hex, 16)
        .map_err(|_| crate::TrilightError::Color(format!("Invalid hex color: {s}")))?;
    if hex.len() == 6 {
        Ok(0xFF00_0000 | val)
    } else {
        Ok(val)
    }
}

/// Format a color as `#RRGGBB`, dropping alpha.
pub fn format_color(val: u32) -> String {
    format!("#{:06X}", val & RGB_MASK)
}
