///! Twilight window module
///!
///! Computes, for each observation timestamp, when the sky last got dark
///! enough and when it next brightens: the sun's most recent rise above a
///! depressed horizon before the timestamp and its next setting below it
///! after the timestamp.

pub mod calculator;
pub mod solar;
pub mod types;

pub use calculator::TwilightCalculator;
pub use solar::{NoaaSolar, SolarEphemeris};
pub use types::{TwilightCategory, TwilightWindow};
