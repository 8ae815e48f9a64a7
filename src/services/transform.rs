use chrono::{DateTime, NaiveDate};
use thiserror::Error;

use crate::models::{ChainId, ChainSummary, RawTvlPoint, TvlCsvRow, TvlPoint};

const HISTORY_LEN: usize = 30;

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("no data")]
    NoData,

    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}

#[derive(Debug, Clone, PartialEq)]
struct DatedTvl {
    date: NaiveDate,
    tvl: Option<f64>,
}

impl DatedTvl {
    fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Resolve raw points to (UTC date, amount) pairs in upstream order.
fn normalize(points: &[RawTvlPoint]) -> Result<Vec<DatedTvl>, TransformError> {
    if points.is_empty() {
        return Err(TransformError::NoData);
    }

    points
        .iter()
        .map(|p| {
            let date = DateTime::from_timestamp(p.date, 0)
                .ok_or(TransformError::InvalidTimestamp(p.date))?
                .date_naive();
            Ok(DatedTvl { date, tvl: p.tvl.resolve() })
        })
        .collect()
}

/// Build the per-chain summary served by `/api/tvl/{chain}` and `/api/tvl/all`.
pub fn summarize(chain: ChainId, points: &[RawTvlPoint]) -> Result<ChainSummary, TransformError> {
    let mut dated = normalize(points)?;

    // Stable: same-day points keep their upstream order.
    dated.sort_by(|a, b| b.date.cmp(&a.date));

    let latest = &dated[0];
    let (change, percent_change) = match dated.get(1) {
        Some(previous) => day_over_day(latest.tvl, previous.tvl),
        None => (Some(0.0), Some(0.0)),
    };

    let history = dated
        .iter()
        .take(HISTORY_LEN)
        .map(|p| TvlPoint { date: p.date_string(), tvl: p.tvl })
        .collect();

    Ok(ChainSummary {
        chain,
        latest_date: latest.date_string(),
        tvl: latest.tvl,
        tvl_change_24h: change,
        tvl_percent_change_24h: percent_change,
        history,
    })
}

// A missing amount on either side leaves both figures undefined.
fn day_over_day(latest: Option<f64>, previous: Option<f64>) -> (Option<f64>, Option<f64>) {
    let (Some(latest), Some(previous)) = (latest, previous) else {
        return (None, None);
    };

    let change = latest - previous;
    let percent = if previous > 0.0 { change / previous * 100.0 } else { 0.0 };
    (Some(change), Some(percent))
}

/// Every point of a chain as export rows, in upstream order.
pub fn csv_rows(chain: ChainId, points: &[RawTvlPoint]) -> Result<Vec<TvlCsvRow>, TransformError> {
    Ok(normalize(points)?
        .into_iter()
        .map(|p| TvlCsvRow { chain, date: p.date_string(), tvl: p.tvl })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TvlValue;

    const DAY: i64 = 86_400;

    fn point(date: i64, tvl: &str) -> RawTvlPoint {
        RawTvlPoint::new(date, TvlValue::Text(tvl.to_string()))
    }

    #[test]
    fn test_day_over_day_change() {
        let summary = summarize(
            ChainId::Ethereum,
            &[point(1000, "100"), point(DAY + 1000, "110")],
        )
        .unwrap();

        assert_eq!(summary.tvl, Some(110.0));
        assert_eq!(summary.latest_date, "1970-01-02");
        assert_eq!(summary.tvl_change_24h, Some(10.0));
        assert_eq!(summary.tvl_percent_change_24h, Some(10.0));
    }

    #[test]
    fn test_single_point_has_zero_change() {
        let summary = summarize(ChainId::Sui, &[point(1_700_000_000, "5")]).unwrap();

        assert_eq!(summary.tvl, Some(5.0));
        assert_eq!(summary.tvl_change_24h, Some(0.0));
        assert_eq!(summary.tvl_percent_change_24h, Some(0.0));
        assert_eq!(summary.history.len(), 1);
    }

    #[test]
    fn test_empty_series_is_no_data() {
        assert_eq!(summarize(ChainId::Sui, &[]), Err(TransformError::NoData));
        assert_eq!(csv_rows(ChainId::Sui, &[]), Err(TransformError::NoData));
    }

    #[test]
    fn test_zero_previous_gives_zero_percent() {
        let summary = summarize(ChainId::Near, &[point(0, "0"), point(DAY, "50")]).unwrap();

        assert_eq!(summary.tvl_change_24h, Some(50.0));
        assert_eq!(summary.tvl_percent_change_24h, Some(0.0));
    }

    #[test]
    fn test_history_is_capped_and_descending() {
        let points: Vec<_> = (0..45).map(|d| point(d * DAY, &d.to_string())).collect();
        let summary = summarize(ChainId::Base, &points).unwrap();

        assert_eq!(summary.history.len(), 30);
        assert_eq!(summary.history[0].tvl, Some(44.0));
        assert_eq!(summary.history[29].tvl, Some(15.0));
        assert!(summary.history.windows(2).all(|w| w[0].date > w[1].date));
    }

    #[test]
    fn test_short_history_keeps_every_point() {
        let points = [point(2 * DAY, "3"), point(0, "1"), point(DAY, "2")];
        let summary = summarize(ChainId::Base, &points).unwrap();

        let dates: Vec<_> = summary.history.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, ["1970-01-03", "1970-01-02", "1970-01-01"]);
    }

    #[test]
    fn test_same_day_points_keep_upstream_order() {
        let points = [point(DAY + 10, "1"), point(DAY + 20, "2"), point(0, "0")];
        let summary = summarize(ChainId::Celo, &points).unwrap();

        let tvls: Vec<_> = summary.history.iter().map(|p| p.tvl).collect();
        assert_eq!(tvls, [Some(1.0), Some(2.0), Some(0.0)]);
        assert_eq!(summary.tvl_change_24h, Some(-1.0));
        assert_eq!(summary.tvl_percent_change_24h, Some(-50.0));
    }

    #[test]
    fn test_bad_values_are_kept_as_null() {
        let points = [point(0, "100"), point(DAY, "oops")];
        let summary = summarize(ChainId::Sei, &points).unwrap();

        assert_eq!(summary.tvl, None);
        assert_eq!(summary.tvl_change_24h, None);
        assert_eq!(summary.tvl_percent_change_24h, None);
        assert_eq!(summary.history.len(), 2);
        assert_eq!(summary.history[1].tvl, Some(100.0));
    }

    #[test]
    fn test_out_of_range_timestamp_fails() {
        let err = summarize(ChainId::Sei, &[point(i64::MAX, "1")]).unwrap_err();
        assert_eq!(err, TransformError::InvalidTimestamp(i64::MAX));
    }

    #[test]
    fn test_csv_rows_keep_all_points() {
        let points: Vec<_> = (0..40).map(|d| point(d * DAY, "1")).collect();
        let rows = csv_rows(ChainId::Fantom, &points).unwrap();

        assert_eq!(rows.len(), 40);
        assert!(rows.iter().all(|r| r.chain == ChainId::Fantom));
        assert_eq!(rows[0].date, "1970-01-01");
    }
}
