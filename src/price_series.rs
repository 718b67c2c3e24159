//! Loading and cleaning of daily close-price series.
//!
//! Files are either CSV with a `date` and `close` column or a JSON array of
//! `{"date": "YYYY-MM-DD", "close": 123.4}` objects. Market-data exports with
//! `Date`, `Close` and `Adj Close` columns load too; the adjusted close wins
//! when both are present, and any other columns are ignored.

use crate::models::PricePoint;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// One row of a price file before the close column is chosen.
#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(default, alias = "Close")]
    close: Option<f64>,
    #[serde(default, alias = "Adj Close", alias = "adjClose")]
    adj_close: Option<f64>,
}

impl PriceRow {
    fn into_price_point(self) -> Result<PricePoint> {
        let close = self
            .adj_close
            .or(self.close)
            .ok_or_else(|| anyhow!("No close price for {}", self.date))?;
        Ok(PricePoint::new(self.date, close))
    }
}

/// Sorts by date, drops unusable closes, and keeps the last row for a
/// repeated date.
pub fn normalize(points: Vec<PricePoint>) -> Vec<PricePoint> {
    let total = points.len();
    let mut by_date: BTreeMap<_, f64> = BTreeMap::new();
    let mut rejected = 0usize;

    for point in points {
        if !point.close.is_finite() || point.close <= 0.0 {
            rejected += 1;
            continue;
        }
        by_date.insert(point.date, point.close);
    }

    if rejected > 0 {
        warn!(
            "Dropped {} of {} price rows with non-positive or non-finite closes",
            rejected, total
        );
    }

    by_date
        .into_iter()
        .map(|(date, close)| PricePoint::new(date, close))
        .collect()
}

pub fn load_prices_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PricePoint>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open price file: {:?}", path.as_ref()))?;

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(file);
    let mut points = Vec::new();

    for (row, result) in reader.deserialize::<PriceRow>().enumerate() {
        let point = result
            .map_err(anyhow::Error::from)
            .and_then(PriceRow::into_price_point)
            .with_context(|| format!("Failed to parse price row {}", row + 1))?;
        points.push(point);
    }

    Ok(points)
}

pub fn load_prices_json<P: AsRef<Path>>(path: P) -> Result<Vec<PricePoint>> {
    let file = File::open(&path)
        .with_context(|| format!("Failed to open price file: {:?}", path.as_ref()))?;

    let rows: Vec<PriceRow> = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse price file: {:?}", path.as_ref()))?;
    rows.into_iter()
        .enumerate()
        .map(|(row, raw)| {
            raw.into_price_point()
                .with_context(|| format!("Failed to parse price row {}", row + 1))
        })
        .collect()
}

/// Load a price file by extension and normalize it.
pub fn load_prices<P: AsRef<Path>>(path: P) -> Result<Vec<PricePoint>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let raw = match extension.as_deref() {
        Some("csv") => load_prices_csv(path)?,
        Some("json") => load_prices_json(path)?,
        other => {
            return Err(anyhow!(
                "Unsupported price file extension {:?} for {}; expected .csv or .json",
                other.unwrap_or(""),
                path.display()
            ))
        }
    };

    let points = normalize(raw);
    info!("Loaded {} price points from {}", points.len(), path.display());
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn normalize_sorts_dedups_and_drops_bad_rows() {
        let points = vec![
            PricePoint::new(date(2021, 1, 5), 12.0),
            PricePoint::new(date(2021, 1, 4), 10.0),
            PricePoint::new(date(2021, 1, 5), 13.0),
            PricePoint::new(date(2021, 1, 6), 0.0),
            PricePoint::new(date(2021, 1, 7), f64::NAN),
        ];

        let cleaned = normalize(points);
        assert_eq!(
            cleaned,
            vec![
                PricePoint::new(date(2021, 1, 4), 10.0),
                PricePoint::new(date(2021, 1, 5), 13.0),
            ]
        );
    }

    #[test]
    fn loads_csv_with_dashboard_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Date,Adj Close").unwrap();
        writeln!(file, "2021-02-02, 101.5").unwrap();
        writeln!(file, "2021-02-01,100.0").unwrap();
        drop(file);

        let points = load_prices(&path).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], PricePoint::new(date(2021, 2, 1), 100.0));
        assert_eq!(points[1].close, 101.5);
    }

    #[test]
    fn prefers_adjusted_close_in_full_market_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spy.csv");
        std::fs::write(
            &path,
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2021-01-04,1,1,1,100.0,99.0,10\n\
             2021-01-05,1,1,1,101.0,100.5,12\n",
        )
        .unwrap();

        let points = load_prices(&path).unwrap();
        assert_eq!(
            points,
            vec![
                PricePoint::new(date(2021, 1, 4), 99.0),
                PricePoint::new(date(2021, 1, 5), 100.5),
            ]
        );
    }

    #[test]
    fn plain_close_column_is_used_without_adjusted_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.csv");
        std::fs::write(&path, "Date,Open,Close,Volume\n2021-01-04,1,42.0,10\n").unwrap();

        let points = load_prices(&path).unwrap();
        assert_eq!(points, vec![PricePoint::new(date(2021, 1, 4), 42.0)]);
    }

    #[test]
    fn row_without_any_close_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_close.csv");
        std::fs::write(&path, "Date,Open,Volume\n2021-01-04,1,10\n").unwrap();

        let err = load_prices(&path).unwrap_err();
        assert!(format!("{err:#}").contains("No close price"));
    }

    #[test]
    fn loads_json_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.json");
        std::fs::write(
            &path,
            r#"[{"date":"2021-03-01","close":50.0},{"date":"2021-03-02","close":51.0}]"#,
        )
        .unwrap();

        let points = load_prices(&path).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].date, date(2021, 3, 2));
    }

    #[test]
    fn rejects_unknown_extensions_and_bad_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prices.txt");
        std::fs::write(&path, "date,close\n").unwrap();
        assert!(load_prices(&path).is_err());

        let path = dir.path().join("broken.csv");
        std::fs::write(&path, "date,close\nnot-a-date,1.0\n").unwrap();
        let err = load_prices(&path).unwrap_err();
        assert!(format!("{err:#}").contains("row 1"));
    }
}
