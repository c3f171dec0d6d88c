///! Observing run configuration
///!
///! One TOML file carries the catalogue API key, the observer's position,
///! the UT offset applied to scraped timestamps, and the optional
///! catalogue query parameters (the `GET targets` surface of the AAVSO
///! target tool).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    /// Degrees north of the equator (south negative)
    pub latitude: f64,
    /// Degrees east of the prime meridian (west negative)
    pub longitude: f64,
    /// Metres above sea level
    pub elevation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservingConfig {
    pub api_key: String,

    pub latitude: f64,
    pub longitude: f64,

    #[serde(default)]
    pub elevation: f64,

    /// Whole hours added to every scraped timestamp (site local time vs UT)
    #[serde(default)]
    pub ut_offset: i64,

    #[serde(default)]
    pub filter: FilterParams,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Optional parameters forwarded to the catalogue query. Anything left
/// unset is omitted from the request; the omissions are surfaced once as a
/// warning so a too-broad query is visible in the logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterParams {
    /// Observing sections, e.g. ["eb"] for eclipsing binaries
    pub obs_section: Option<Vec<String>>,
    /// Restrict to targets currently observable from the site
    pub observable: Option<bool>,
    pub orderby: Option<String>,
    pub reverse: Option<bool>,
    /// Minimum target altitude in degrees
    pub targetaltitude: Option<f64>,
    /// Maximum sun altitude in degrees
    pub sunaltitude: Option<f64>,
    /// Reference time for the observability computation
    pub time: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ObservingConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ObservingConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn position(&self) -> GeoPosition {
        GeoPosition {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation: self.elevation,
        }
    }

    /// Assemble the HTTP query pairs for the catalogue request. The
    /// observer position is always included; unset filter parameters are
    /// skipped and reported in a single warning.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("latitude".into(), self.latitude.to_string()),
            ("longitude".into(), self.longitude.to_string()),
        ];
        let mut missing: Vec<&str> = Vec::new();

        match &self.filter.obs_section {
            Some(sections) => {
                for section in sections {
                    params.push(("obs_section".into(), section.clone()));
                }
            }
            None => missing.push("obs_section"),
        }

        push_param(&mut params, &mut missing, "observable", &self.filter.observable);
        push_param(&mut params, &mut missing, "orderby", &self.filter.orderby);
        push_param(&mut params, &mut missing, "reverse", &self.filter.reverse);
        push_param(
            &mut params,
            &mut missing,
            "targetaltitude",
            &self.filter.targetaltitude,
        );
        push_param(&mut params, &mut missing, "sunaltitude", &self.filter.sunaltitude);
        push_param(&mut params, &mut missing, "time", &self.filter.time);

        if !missing.is_empty() {
            tracing::warn!("Missing catalogue query parameters: {:?}", missing);
        }

        params
    }
}

fn push_param<T: ToString>(
    params: &mut Vec<(String, String)>,
    missing: &mut Vec<&'static str>,
    key: &'static str,
    value: &Option<T>,
) {
    match value {
        Some(v) => params.push((key.into(), v.to_string())),
        None => missing.push(key),
    }
}
