//! Column-set detection for price tables.
//!
//! A dataset only needs to expose its column labels through [`ColumnSet`];
//! row contents are never inspected.

use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

pub const OHLC_COLUMNS: [&str; 4] = ["open", "high", "low", "close"];
pub const OHLCV_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Typed accessor for the column labels of a tabular dataset.
pub trait ColumnSet {
    fn column_names(&self) -> Result<HashSet<String>>;
}

impl ColumnSet for [String] {
    fn column_names(&self) -> Result<HashSet<String>> {
        Ok(self.iter().cloned().collect())
    }
}

impl ColumnSet for [&str] {
    fn column_names(&self) -> Result<HashSet<String>> {
        Ok(self.iter().map(|s| s.to_string()).collect())
    }
}

impl ColumnSet for Vec<String> {
    fn column_names(&self) -> Result<HashSet<String>> {
        self.as_slice().column_names()
    }
}

impl ColumnSet for Vec<&str> {
    fn column_names(&self) -> Result<HashSet<String>> {
        self.as_slice().column_names()
    }
}

impl<const N: usize> ColumnSet for [&str; N] {
    fn column_names(&self) -> Result<HashSet<String>> {
        self.as_slice().column_names()
    }
}

impl ColumnSet for HashSet<String> {
    fn column_names(&self) -> Result<HashSet<String>> {
        Ok(self.clone())
    }
}

impl<V> ColumnSet for HashMap<String, V> {
    fn column_names(&self) -> Result<HashSet<String>> {
        Ok(self.keys().cloned().collect())
    }
}

impl<V> ColumnSet for BTreeMap<String, V> {
    fn column_names(&self) -> Result<HashSet<String>> {
        Ok(self.keys().cloned().collect())
    }
}

/// A CSV header row.
impl ColumnSet for csv::StringRecord {
    fn column_names(&self) -> Result<HashSet<String>> {
        Ok(self.iter().map(|s| s.trim().to_string()).collect())
    }
}

/// Column-oriented JSON (`{"open": [...], ...}`) or record-oriented JSON
/// (`[{"open": 1.0, ...}, ...]`). Records must all be objects; their keys are
/// unioned.
impl ColumnSet for Value {
    fn column_names(&self) -> Result<HashSet<String>> {
        match self {
            Value::Object(map) => Ok(map.keys().cloned().collect()),
            Value::Array(rows) => {
                let mut names = HashSet::new();
                for (index, row) in rows.iter().enumerate() {
                    let object = row.as_object().ok_or_else(|| {
                        Error::MalformedDataset(format!("row {} is not an object: {}", index, row))
                    })?;
                    names.extend(object.keys().cloned());
                }
                Ok(names)
            }
            other => Err(Error::MalformedDataset(format!(
                "expected an object or an array of objects, got {}",
                other
            ))),
        }
    }
}

impl<T: ColumnSet + ?Sized> ColumnSet for &T {
    fn column_names(&self) -> Result<HashSet<String>> {
        (**self).column_names()
    }
}

/// Read the header row of a CSV source and return it as a column set.
pub fn csv_columns<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<HashSet<String>> {
    let headers = reader.headers()?;
    headers.column_names()
}

fn has_columns<D: ColumnSet + ?Sized>(data: &D, required: &[&str]) -> Result<bool> {
    let names = data.column_names()?;
    Ok(required.iter().all(|col| names.contains(*col)))
}

/// True when the dataset carries open, high, low and close columns.
pub fn is_ohlc<D: ColumnSet + ?Sized>(data: &D) -> Result<bool> {
    has_columns(data, &OHLC_COLUMNS)
}

/// True when the dataset carries open, high, low, close and volume columns.
pub fn is_ohlcv<D: ColumnSet + ?Sized>(data: &D) -> Result<bool> {
    has_columns(data, &OHLCV_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_exact_ohlc_columns() {
        let cols = ["open", "high", "low", "close"];
        assert!(is_ohlc(&cols).unwrap());
        assert!(!is_ohlcv(&cols).unwrap());
    }

    #[test]
    fn test_exact_ohlcv_columns() {
        let cols = vec!["close", "volume", "open", "low", "high"];
        assert!(is_ohlc(&cols).unwrap());
        assert!(is_ohlcv(&cols).unwrap());
    }

    #[test]
    fn test_missing_any_required_column() {
        for missing in OHLC_COLUMNS {
            let cols: Vec<String> = OHLCV_COLUMNS
                .iter()
                .filter(|c| **c != missing)
                .map(|c| c.to_string())
                .collect();
            assert!(!is_ohlc(&cols).unwrap(), "missing {}", missing);
            assert!(!is_ohlcv(&cols).unwrap(), "missing {}", missing);
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let cols = ["Open", "High", "Low", "Close"];
        assert!(!is_ohlc(&cols).unwrap());
    }

    #[test]
    fn test_mapping_columns() {
        let mut frame: HashMap<String, Vec<f64>> = HashMap::new();
        for col in OHLCV_COLUMNS {
            frame.insert(col.to_string(), vec![1.0]);
        }
        frame.insert("ticker".to_string(), vec![]);
        assert!(is_ohlcv(&frame).unwrap());
    }

    #[test]
    fn test_csv_header_columns() {
        let data = "ticker,time,open,high,low,close,volume\nVCB,2024-01-02,1,2,0.5,1.5,100\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let columns = csv_columns(&mut reader).unwrap();
        assert!(is_ohlcv(&columns).unwrap());
    }

    #[test]
    fn test_json_columns_and_records() {
        let by_column = json!({"open": [1], "high": [2], "low": [0], "close": [1]});
        assert!(is_ohlc(&by_column).unwrap());
        assert!(!is_ohlcv(&by_column).unwrap());

        let records = json!([
            {"open": 1, "high": 2, "low": 0, "close": 1},
            {"volume": 100}
        ]);
        assert!(is_ohlcv(&records).unwrap());
    }

    #[test]
    fn test_malformed_dataset_is_an_error() {
        assert!(matches!(is_ohlc(&json!(42)), Err(Error::MalformedDataset(_))));
        assert!(matches!(
            is_ohlcv(&json!([{"open": 1}, "close"])),
            Err(Error::MalformedDataset(_))
        ));
    }
}
