///! Twilight categories and the per-row window they produce.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The three standard twilight definitions, each a fixed solar depression
/// below the geometric horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TwilightCategory {
    Civil,
    Nautical,
    Astronomical,
}

impl TwilightCategory {
    pub const ALL: [TwilightCategory; 3] = [
        TwilightCategory::Civil,
        TwilightCategory::Nautical,
        TwilightCategory::Astronomical,
    ];

    /// Map a single-letter code to a category. Unknown codes fall back to
    /// astronomical twilight with a warning, not an error.
    pub fn from_code(code: &str) -> Self {
        match code {
            "c" => TwilightCategory::Civil,
            "n" => TwilightCategory::Nautical,
            "a" => TwilightCategory::Astronomical,
            _ => {
                warn!("Invalid twilight code {:?}, defaulting to astronomical", code);
                TwilightCategory::Astronomical
            }
        }
    }

    pub fn depression_degrees(&self) -> f64 {
        match self {
            TwilightCategory::Civil => 6.0,
            TwilightCategory::Nautical => 12.0,
            TwilightCategory::Astronomical => 18.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TwilightCategory::Civil => "civil",
            TwilightCategory::Nautical => "nautical",
            TwilightCategory::Astronomical => "astronomical",
        }
    }

    /// Export column pair for this category.
    pub fn column_names(&self) -> (String, String) {
        (
            format!("{}_twilight_start", self.name()),
            format!("{}_twilight_end", self.name()),
        )
    }
}

/// One computed window. A bound is absent when the sun never crosses the
/// depressed horizon around the reference time (polar day or night).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwilightWindow {
    pub category: TwilightCategory,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_map_to_categories() {
        assert_eq!(TwilightCategory::from_code("c"), TwilightCategory::Civil);
        assert_eq!(TwilightCategory::from_code("n"), TwilightCategory::Nautical);
        assert_eq!(TwilightCategory::from_code("a"), TwilightCategory::Astronomical);
    }

    #[test]
    fn test_unknown_code_defaults_to_astronomical() {
        assert_eq!(TwilightCategory::from_code("x"), TwilightCategory::Astronomical);
        assert_eq!(TwilightCategory::from_code(""), TwilightCategory::Astronomical);
    }

    #[test]
    fn test_depression_angles() {
        assert_eq!(TwilightCategory::Civil.depression_degrees(), 6.0);
        assert_eq!(TwilightCategory::Nautical.depression_degrees(), 12.0);
        assert_eq!(TwilightCategory::Astronomical.depression_degrees(), 18.0);
    }

    #[test]
    fn test_column_names() {
        let (start, end) = TwilightCategory::Nautical.column_names();
        assert_eq!(start, "nautical_twilight_start");
        assert_eq!(end, "nautical_twilight_end");
    }
}
