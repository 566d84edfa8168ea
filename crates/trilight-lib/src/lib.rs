//! trilight — indicator light control for a sysfs tri-color LED and backlights.
//!
//! Battery, notification and attention lights share one tri-color LED and
//! are arbitrated by priority; the display and button backlights are
//! written directly.

pub mod arbiter;
pub mod color;
pub mod config;
pub mod error;
pub mod paths;
pub mod port;
pub mod registry;
pub mod state;

pub use error::TrilightError;
pub use registry::{LightHandle, Lights};
pub use state::{Channel, FlashMode, LightState};
