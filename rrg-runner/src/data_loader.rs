//! Price loading for the runner.
//!
//! Two sources feed a [`PriceTable`]:
//! 1. A CSV file of closes, either wide (`date,SYM1,SYM2,...`) or long
//!    (`date,symbol,close`)
//! 2. Synthetic random walks, a developer-only mode for running the pipeline
//!    without market data. Runs on synthetic prices are tagged as such.
//!
//! Missing, empty, `NaN` and unparsable cells all load as NaN. The engine
//! treats any such column as incomplete and drops it.

use chrono::{Datelike, NaiveDate};
use rrg_core::data::{align_closes, CloseSeries};
use rrg_core::{DataError, PriceTable};
use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read prices file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("price CSV has no 'date' column")]
    MissingDateColumn,

    #[error("row {row}: cannot parse date '{value}'")]
    BadDate { row: usize, value: String },

    #[error("column '{symbol}' appears more than once")]
    DuplicateHeader { symbol: String },

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Load a price CSV from disk.
pub fn load_prices_csv(path: &Path) -> Result<PriceTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let table = parse_prices_csv(file)?;
    tracing::info!(
        path = %path.display(),
        rows = table.len(),
        symbols = table.columns().len(),
        "loaded prices"
    );
    Ok(table)
}

/// Parse closes from CSV. The layout is picked from the header: exactly
/// `date,symbol,close` is long format, anything else with a `date` column is
/// wide format.
pub fn parse_prices_csv<R: Read>(reader: R) -> Result<PriceTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let lowered: Vec<String> = headers.iter().map(|h| h.to_ascii_lowercase()).collect();
    let date_idx = lowered
        .iter()
        .position(|h| h == "date")
        .ok_or(LoadError::MissingDateColumn)?;

    if lowered.len() == 3 && lowered.contains(&"symbol".into()) && lowered.contains(&"close".into())
    {
        let symbol_idx = lowered.iter().position(|h| h == "symbol").unwrap_or(1);
        let close_idx = lowered.iter().position(|h| h == "close").unwrap_or(2);
        return parse_long(rdr, date_idx, symbol_idx, close_idx);
    }
    parse_wide(rdr, &headers, date_idx)
}

fn parse_wide<R: Read>(
    mut rdr: csv::Reader<R>,
    headers: &[String],
    date_idx: usize,
) -> Result<PriceTable, LoadError> {
    let mut seen = HashSet::new();
    let mut series: Vec<CloseSeries> = Vec::new();
    let mut column_of_field = Vec::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        if i == date_idx {
            column_of_field.push(None);
            continue;
        }
        if !seen.insert(header.as_str()) {
            return Err(LoadError::DuplicateHeader {
                symbol: header.clone(),
            });
        }
        column_of_field.push(Some(series.len()));
        series.push((header.clone(), Vec::new()));
    }

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let raw_date = record.get(date_idx).unwrap_or("");
        let date = parse_date(raw_date).ok_or_else(|| LoadError::BadDate {
            row: row + 1,
            value: raw_date.to_string(),
        })?;
        for (field, column) in column_of_field.iter().enumerate() {
            if let Some(column) = column {
                let close = parse_close(record.get(field).unwrap_or(""));
                series[*column].1.push((date, close));
            }
        }
    }

    Ok(align_closes(series)?)
}

fn parse_long<R: Read>(
    mut rdr: csv::Reader<R>,
    date_idx: usize,
    symbol_idx: usize,
    close_idx: usize,
) -> Result<PriceTable, LoadError> {
    let mut series: Vec<CloseSeries> = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let raw_date = record.get(date_idx).unwrap_or("");
        let date = parse_date(raw_date).ok_or_else(|| LoadError::BadDate {
            row: row + 1,
            value: raw_date.to_string(),
        })?;
        let symbol = record.get(symbol_idx).unwrap_or("");
        let close = parse_close(record.get(close_idx).unwrap_or(""));
        match series.iter_mut().find(|(s, _)| s == symbol) {
            Some((_, observations)) => observations.push((date, close)),
            None => series.push((symbol.to_string(), vec![(date, close)])),
        }
    }
    Ok(align_closes(series)?)
}

/// `YYYY-MM-DD`, optionally followed by a time component.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_close(raw: &str) -> f64 {
    raw.parse::<f64>().unwrap_or(f64::NAN)
}

/// Write a table as wide CSV. NaN closes become empty cells; finite closes
/// use the shortest form that parses back to the same `f64`.
pub fn write_prices_csv<W: Write>(table: &PriceTable, writer: W) -> Result<(), LoadError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["date".to_string()];
    header.extend(table.symbols().into_iter().map(String::from));
    wtr.write_record(&header)?;

    for (i, date) in table.dates().iter().enumerate() {
        let mut record = vec![date.to_string()];
        for column in table.columns() {
            let close = column.closes[i];
            record.push(if close.is_finite() {
                close.to_string()
            } else {
                String::new()
            });
        }
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Generate synthetic closes for development runs.
///
/// Each symbol gets its own random walk from 100.0, seeded from the symbol
/// name so the same symbol and range always yield the same prices. Weekends
/// are skipped.
pub fn synthetic_prices(
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceTable, LoadError> {
    let series = symbols
        .iter()
        .map(|symbol| (symbol.clone(), synthetic_walk(symbol, start, end)))
        .collect();
    tracing::warn!(
        symbols = symbols.len(),
        %start,
        %end,
        "generating synthetic prices; results are tagged as synthetic"
    );
    Ok(align_closes(series)?)
}

fn synthetic_walk(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, f64)> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    // Per-symbol drift so sectors rotate instead of moving in lockstep.
    let drift: f64 = rng.gen_range(-0.0015..0.0015);
    let mut observations = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday != chrono::Weekday::Sat && weekday != chrono::Weekday::Sun {
            let daily_return: f64 = drift + rng.gen_range(-0.02..0.02);
            price *= 1.0 + daily_return;
            observations.push((current, price));
        }
        current += chrono::Duration::days(1);
    }

    observations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_wide_csv() {
        let csv = "date,^NSEI,^NSEBANK\n\
                   2024-01-05,100.0,50.0\n\
                   2024-01-12,101.5,51.0\n";
        let table = parse_prices_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.dates(), &[date("2024-01-05"), date("2024-01-12")]);
        assert_eq!(table.symbols(), vec!["^NSEI", "^NSEBANK"]);
        assert_eq!(table.closes("^NSEBANK"), Some(&[50.0, 51.0][..]));
    }

    #[test]
    fn missing_and_garbage_cells_are_nan() {
        let csv = "Date,A,B\n2024-01-01,1.0,\n2024-01-02,NaN,x\n2024-01-03,3.0,4.0\n";
        let table = parse_prices_csv(csv.as_bytes()).unwrap();
        let a = table.closes("A").unwrap();
        let b = table.closes("B").unwrap();
        assert!(a[1].is_nan());
        assert!(b[0].is_nan() && b[1].is_nan());
        assert_eq!(b[2], 4.0);
    }

    #[test]
    fn unsorted_rows_are_sorted() {
        let csv = "date,A\n2024-01-03,3\n2024-01-01,1\n2024-01-02,2\n";
        let table = parse_prices_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.closes("A"), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn datetime_values_are_truncated_to_dates() {
        let csv = "date,A\n2024-01-01 00:00:00+05:30,1\n";
        let table = parse_prices_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.dates(), &[date("2024-01-01")]);
    }

    #[test]
    fn parses_long_csv_with_union_of_dates() {
        let csv = "date,symbol,close\n\
                   2024-01-01,SPY,100\n\
                   2024-01-02,SPY,101\n\
                   2024-01-02,XLK,50\n";
        let table = parse_prices_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.symbols(), vec!["SPY", "XLK"]);
        assert!(table.closes("XLK").unwrap()[0].is_nan());
    }

    #[test]
    fn missing_date_column_rejected() {
        let err = parse_prices_csv("day,A\n2024-01-01,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingDateColumn));
    }

    #[test]
    fn bad_date_reports_row() {
        let err = parse_prices_csv("date,A\n2024-01-01,1\n01/02/2024,2\n".as_bytes()).unwrap_err();
        match err {
            LoadError::BadDate { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "01/02/2024");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_header_rejected() {
        let err = parse_prices_csv("date,A,A\n2024-01-01,1,2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateHeader { .. }));
    }

    #[test]
    fn write_then_parse_preserves_gaps() {
        let csv = "date,A,B\n2024-01-01,1.0,\n2024-01-02,2.0,3.0\n";
        let table = parse_prices_csv(csv.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_prices_csv(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "date,A,B\n2024-01-01,1,\n2024-01-02,2,3\n");
    }

    #[test]
    fn synthetic_prices_survive_csv_roundtrip_exactly() {
        let symbols = vec!["SPY".to_string(), "QQQ".to_string()];
        let table = synthetic_prices(&symbols, date("2024-01-01"), date("2024-06-28")).unwrap();
        let mut out = Vec::new();
        write_prices_csv(&table, &mut out).unwrap();
        let back = parse_prices_csv(out.as_slice()).unwrap();
        assert_eq!(back, table);
        assert_eq!(
            rrg_core::fingerprint::dataset_hash(&back),
            rrg_core::fingerprint::dataset_hash(&table)
        );
    }

    #[test]
    fn synthetic_prices_are_deterministic() {
        let symbols = vec!["SPY".to_string(), "QQQ".to_string()];
        let a = synthetic_prices(&symbols, date("2024-01-01"), date("2024-03-31")).unwrap();
        let b = synthetic_prices(&symbols, date("2024-01-01"), date("2024-03-31")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn synthetic_prices_skip_weekends_and_differ_by_symbol() {
        let symbols = vec!["SPY".to_string(), "QQQ".to_string()];
        let table = synthetic_prices(&symbols, date("2024-01-01"), date("2024-01-31")).unwrap();
        // January 2024 has 23 weekdays.
        assert_eq!(table.len(), 23);
        assert!(table
            .dates()
            .iter()
            .all(|d| d.weekday() != chrono::Weekday::Sat && d.weekday() != chrono::Weekday::Sun));
        assert_ne!(table.closes("SPY").unwrap()[0], table.closes("QQQ").unwrap()[0]);
        assert!(table.columns().iter().all(|c| c.is_complete()));
    }
}
