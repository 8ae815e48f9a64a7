use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::ChainId;

/// The `tvl` field as the upstream sends it. Some series carry numbers,
/// some carry numeric strings, and a few carry garbage.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TvlValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl TvlValue {
    /// Coerce to a usable amount. Unparseable, negative and non-finite
    /// values all come back as `None`.
    pub fn resolve(&self) -> Option<f64> {
        let value = match self {
            TvlValue::Number(n) => *n,
            TvlValue::Text(s) => s.trim().parse::<f64>().ok()?,
            TvlValue::Missing => return None,
        };

        (value.is_finite() && value >= 0.0).then_some(value)
    }
}

impl<'de> Deserialize<'de> for TvlValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64().map(TvlValue::Number).unwrap_or(TvlValue::Missing),
            Value::String(s) => TvlValue::Text(s),
            _ => TvlValue::Missing,
        })
    }
}

/// One record of the upstream `/tvl/{chain}` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTvlPoint {
    /// Unix seconds.
    #[serde(deserialize_with = "deserialize_unix_seconds")]
    pub date: i64,
    #[serde(default)]
    pub tvl: TvlValue,
}

#[cfg(test)]
impl RawTvlPoint {
    pub fn new(date: i64, tvl: TvlValue) -> Self {
        Self { date, tvl }
    }
}

// Timestamps arrive as integers, but fractional seconds are accepted and truncated.
fn deserialize_unix_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Int(i64),
        Float(f64),
    }

    match Seconds::deserialize(deserializer)? {
        Seconds::Int(s) => Ok(s),
        Seconds::Float(s) if s.is_finite() => Ok(s.trunc() as i64),
        Seconds::Float(s) => Err(serde::de::Error::custom(format!("invalid timestamp {s}"))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TvlPoint {
    /// `YYYY-MM-DD`, UTC.
    pub date: String,
    pub tvl: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainSummary {
    pub chain: ChainId,
    pub latest_date: String,
    pub tvl: Option<f64>,
    pub tvl_change_24h: Option<f64>,
    pub tvl_percent_change_24h: Option<f64>,
    /// Most recent entries first, capped at 30.
    pub history: Vec<TvlPoint>,
}

/// Body of `GET /api/tvl/all`.
#[derive(Debug, Clone, Serialize)]
pub struct AllChainsTvl {
    /// Server local time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub total_tvl: f64,
    pub chains: Vec<ChainSummary>,
}

/// One line of the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TvlCsvRow {
    pub chain: ChainId,
    pub date: String,
    pub tvl: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_numeric_and_string_tvl() {
        let points: Vec<RawTvlPoint> = serde_json::from_str(
            r#"[{"date": 1000, "tvl": 12.5}, {"date": 2000.7, "tvl": "99"}, {"date": 3000}]"#,
        )
        .unwrap();

        assert_eq!(points[0], RawTvlPoint::new(1000, TvlValue::Number(12.5)));
        assert_eq!(points[1], RawTvlPoint::new(2000, TvlValue::Text("99".into())));
        assert_eq!(points[2].tvl, TvlValue::Missing);
    }

    #[test]
    fn test_absent_tvl_defaults_to_missing() {
        assert_eq!(TvlValue::default(), TvlValue::Missing);
    }

    #[test]
    fn test_null_and_object_tvl_are_missing() {
        let points: Vec<RawTvlPoint> =
            serde_json::from_str(r#"[{"date": 1, "tvl": null}, {"date": 2, "tvl": {"x": 1}}]"#).unwrap();

        assert!(points.iter().all(|p| p.tvl == TvlValue::Missing));
    }

    #[test]
    fn test_rejects_non_numeric_date() {
        let parsed: Result<Vec<RawTvlPoint>, _> =
            serde_json::from_str(r#"[{"date": "yesterday", "tvl": 1}]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_resolve_coerces_or_nulls() {
        assert_eq!(TvlValue::Number(5.0).resolve(), Some(5.0));
        assert_eq!(TvlValue::Text(" 42.5 ".into()).resolve(), Some(42.5));
        assert_eq!(TvlValue::Text("n/a".into()).resolve(), None);
        assert_eq!(TvlValue::Text("NaN".into()).resolve(), None);
        assert_eq!(TvlValue::Number(-1.0).resolve(), None);
        assert_eq!(TvlValue::Missing.resolve(), None);
    }

    #[test]
    fn test_missing_tvl_serializes_as_null() {
        let point = TvlPoint { date: "2024-01-01".into(), tvl: None };
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"date":"2024-01-01","tvl":null}"#
        );
    }
}
