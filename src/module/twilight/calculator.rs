///! Twilight window calculator
///!
///! Binds a site position to a solar ephemeris and evaluates one window
///! per reference timestamp.

use chrono::NaiveDateTime;

use super::solar::{NoaaSolar, SolarEphemeris};
use super::types::{TwilightCategory, TwilightWindow};
use crate::config::GeoPosition;

pub struct TwilightCalculator {
    position: GeoPosition,
    solar: Box<dyn SolarEphemeris>,
}

impl TwilightCalculator {
    pub fn new(position: GeoPosition) -> Self {
        Self::with_solar(position, Box::new(NoaaSolar))
    }

    /// Construct with a caller-supplied ephemeris (tests use this).
    pub fn with_solar(position: GeoPosition, solar: Box<dyn SolarEphemeris>) -> Self {
        Self { position, solar }
    }

    /// The window around one reference timestamp: the sun's last rise
    /// above the category's horizon before it and its next set below it
    /// after it.
    pub fn window(&self, category: TwilightCategory, reference: NaiveDateTime) -> TwilightWindow {
        let depression = category.depression_degrees();
        TwilightWindow {
            category,
            start: self
                .solar
                .previous_rising(self.position, depression, reference),
            end: self.solar.next_setting(self.position, depression, reference),
        }
    }

    pub fn windows(
        &self,
        category: TwilightCategory,
        references: &[NaiveDateTime],
    ) -> Vec<TwilightWindow> {
        references
            .iter()
            .map(|reference| self.window(category, *reference))
            .collect()
    }
}
