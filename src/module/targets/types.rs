///! Data model for catalogue target records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One row of the target catalogue. The star name and coordinates are
/// typed; every other column the API returns is carried through untouched
/// in `extra` so filters and exports can still reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub star_name: String,
    #[serde(default)]
    pub ra: Option<f64>,
    #[serde(default)]
    pub dec: Option<f64>,
    #[serde(default)]
    pub other_info: Option<String>,
    /// Passthrough catalogue columns, keyed by the API field name.
    /// BTreeMap keeps export column order stable.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TargetRecord {
    /// Look up a numeric column by name, covering both the typed fields
    /// and the passthrough map.
    pub fn numeric_field(&self, name: &str) -> Option<f64> {
        match name {
            "ra" => self.ra,
            "dec" => self.dec,
            _ => self.extra.get(name).and_then(Value::as_f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "star_name": "TV Boo",
        "ra": 214.1529,
        "dec": 42.3615,
        "other_info": "RRC",
        "mean_mag": 10.97,
        "period": 0.3126,
        "solar_conjunction": false
    }"#;

    #[test]
    fn test_deserialize_keeps_extra_columns() {
        let record: TargetRecord = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(record.star_name, "TV Boo");
        assert_eq!(record.dec, Some(42.3615));
        assert_eq!(record.other_info.as_deref(), Some("RRC"));
        assert_eq!(record.extra.get("mean_mag"), Some(&Value::from(10.97)));
        assert_eq!(
            record.extra.get("solar_conjunction"),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn test_numeric_field_covers_typed_and_extra() {
        let record: TargetRecord = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(record.numeric_field("dec"), Some(42.3615));
        assert_eq!(record.numeric_field("period"), Some(0.3126));
        // Non-numeric and unknown columns filter as absent
        assert_eq!(record.numeric_field("solar_conjunction"), None);
        assert_eq!(record.numeric_field("no_such_column"), None);
    }

    #[test]
    fn test_missing_optional_fields_deserialize_as_none() {
        let record: TargetRecord = serde_json::from_str(r#"{"star_name": "SW Lac"}"#).unwrap();
        assert_eq!(record.ra, None);
        assert_eq!(record.dec, None);
        assert!(record.extra.is_empty());
    }
}
