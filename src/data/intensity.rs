//! 24-hour carbon intensity reshaping
//!
//! Turns the `/intensity/date` payload into a table indexed by period start,
//! keeping only the numeric fields of each period's `intensity` object.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fetcher::ApiError;

/// Timestamp format used by the API for period boundaries
const PERIOD_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// One numeric series, aligned with the table index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityColumn {
    /// Field name within the `intensity` object (e.g. "forecast")
    pub name: String,
    /// One value per index row; `None` where the API reported null or omitted it
    pub values: Vec<Option<f64>>,
}

/// Carbon intensity (gCO2/kWh) per half-hour period
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IntensityTable {
    /// Period start timestamps as sent by the API
    pub index: Vec<String>,
    /// Numeric columns in first-seen order
    pub columns: Vec<IntensityColumn>,
}

#[derive(Debug, Deserialize)]
struct IntensityResponse {
    data: Vec<IntensityPeriod>,
}

#[derive(Debug, Deserialize)]
struct IntensityPeriod {
    from: String,
    #[serde(default)]
    intensity: Option<Map<String, Value>>,
}

impl IntensityTable {
    /// Reshape a `{"data": [{"from": ..., "intensity": {...}}, ...]}` document
    ///
    /// A field becomes a column only if every period holds a number or null for
    /// it and at least one holds a number. Text fields such as `index` and
    /// booleans are dropped.
    pub fn from_json(value: &Value) -> Result<Self, ApiError> {
        let response = IntensityResponse::deserialize(value)?;
        let periods = response.data;

        let mut names: Vec<&str> = Vec::new();
        for fields in periods.iter().filter_map(|p| p.intensity.as_ref()) {
            for key in fields.keys() {
                if !names.contains(&key.as_str()) {
                    names.push(key);
                }
            }
        }

        let columns = names
            .into_iter()
            .filter_map(|name| numeric_column(name, &periods))
            .collect();

        Ok(Self {
            index: periods.iter().map(|p| p.from.clone()).collect(),
            columns,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&IntensityColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Chart points `(row, value)` for a column, skipping missing values
    pub fn points(&self, column: &IntensityColumn) -> Vec<(f64, f64)> {
        column
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
            .collect()
    }

    /// Smallest and largest value across all columns
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.columns
            .iter()
            .flat_map(|c| c.values.iter().flatten().copied())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Short `HH:MM` label for an index row, falling back to the raw timestamp
    pub fn period_label(&self, row: usize) -> Option<String> {
        let raw = self.index.get(row)?;
        Some(
            parse_period_start(raw)
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| raw.clone()),
        )
    }
}

/// Builds a column if `name` holds only numbers or nulls across all periods
fn numeric_column(name: &str, periods: &[IntensityPeriod]) -> Option<IntensityColumn> {
    let mut values = Vec::with_capacity(periods.len());
    let mut seen_number = false;

    for period in periods {
        match period.intensity.as_ref().and_then(|fields| fields.get(name)) {
            None | Some(Value::Null) => values.push(None),
            Some(Value::Number(n)) => {
                seen_number = true;
                values.push(n.as_f64());
            }
            Some(_) => return None,
        }
    }

    seen_number.then(|| IntensityColumn {
        name: name.to_string(),
        values,
    })
}

/// Parses a period boundary such as `2023-01-01T00:00Z`
///
/// Also accepts full RFC 3339 timestamps.
pub fn parse_period_start(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, PERIOD_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|t| t.naive_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_reshape_drops_index_and_keeps_numeric_columns() {
        let value = json!({
            "data": [{
                "from": "2023-01-01T00:00Z",
                "intensity": {"forecast": 200, "actual": 190, "index": "moderate"}
            }]
        });

        let table = IntensityTable::from_json(&value).unwrap();

        assert_eq!(table.index, vec!["2023-01-01T00:00Z".to_string()]);
        assert_eq!(table.column_names(), vec!["forecast", "actual"]);
        assert_eq!(table.column("forecast").unwrap().values, vec![Some(200.0)]);
        assert_eq!(table.column("actual").unwrap().values, vec![Some(190.0)]);
        assert!(table.column("index").is_none());
    }

    #[test]
    fn test_null_actual_is_kept_as_missing_value() {
        let value = json!({
            "data": [
                {"from": "2023-01-01T00:00Z", "intensity": {"forecast": 200, "actual": 190, "index": "moderate"}},
                {"from": "2023-01-01T00:30Z", "intensity": {"forecast": 180, "actual": null, "index": "low"}}
            ]
        });

        let table = IntensityTable::from_json(&value).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.column("actual").unwrap().values, vec![Some(190.0), None]);
        let actual = table.column("actual").unwrap();
        assert_eq!(table.points(actual), vec![(0.0, 190.0)]);
    }

    #[test]
    fn test_all_null_column_is_dropped() {
        let value = json!({
            "data": [
                {"from": "2023-01-01T00:00Z", "intensity": {"forecast": 200, "actual": null}},
                {"from": "2023-01-01T00:30Z", "intensity": {"forecast": 180, "actual": null}}
            ]
        });

        let table = IntensityTable::from_json(&value).unwrap();

        assert_eq!(table.column_names(), vec!["forecast"]);
    }

    #[test]
    fn test_mixed_text_and_numbers_drops_column() {
        let value = json!({
            "data": [
                {"from": "a", "intensity": {"forecast": 200, "flag": true}},
                {"from": "b", "intensity": {"forecast": "n/a", "flag": false}}
            ]
        });

        let table = IntensityTable::from_json(&value).unwrap();

        assert!(table.columns.is_empty());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_intensity_object_gives_missing_values() {
        let value = json!({
            "data": [
                {"from": "2023-01-01T00:00Z", "intensity": {"forecast": 200}},
                {"from": "2023-01-01T00:30Z"}
            ]
        });

        let table = IntensityTable::from_json(&value).unwrap();

        assert_eq!(table.column("forecast").unwrap().values, vec![Some(200.0), None]);
    }

    #[test]
    fn test_wrong_shape_is_a_parse_error() {
        let value = json!({"data": {"generationmix": []}});
        assert!(matches!(IntensityTable::from_json(&value), Err(ApiError::Parse(_))));

        let value = json!({"data": [{"intensity": {"forecast": 1}}]});
        assert!(matches!(IntensityTable::from_json(&value), Err(ApiError::Parse(_))));
    }

    #[test]
    fn test_empty_data_gives_empty_table() {
        let table = IntensityTable::from_json(&json!({"data": []})).unwrap();
        assert!(table.is_empty());
        assert!(table.value_range().is_none());
    }

    #[test]
    fn test_value_range_spans_all_columns() {
        let value = json!({
            "data": [
                {"from": "a", "intensity": {"forecast": 200, "actual": 150}},
                {"from": "b", "intensity": {"forecast": 120, "actual": 260}}
            ]
        });

        let table = IntensityTable::from_json(&value).unwrap();

        assert_eq!(table.value_range(), Some((120.0, 260.0)));
    }

    #[test]
    fn test_parse_period_start() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(13, 30, 0)
            .unwrap();

        assert_eq!(parse_period_start("2023-01-01T13:30Z"), Some(expected));
        assert_eq!(parse_period_start("2023-01-01T13:30:00Z"), Some(expected));
        assert_eq!(parse_period_start("yesterday"), None);
    }

    #[test]
    fn test_period_label() {
        let table = IntensityTable {
            index: vec!["2023-01-01T13:30Z".to_string(), "later".to_string()],
            columns: Vec::new(),
        };

        assert_eq!(table.period_label(0).as_deref(), Some("13:30"));
        assert_eq!(table.period_label(1).as_deref(), Some("later"));
        assert_eq!(table.period_label(2), None);
    }
}
