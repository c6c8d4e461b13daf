//! Chart-ready data derived from parsed records

use crate::commands::Protocol;
use crate::common::{Error, Result};
use crate::parser::{Role, TestRecord};
use crate::quantity::{parse_interval_end, Quantity};

pub const INTERVAL_COLUMN: &str = "Interval";
pub const TRANSFER_COLUMN: &str = "Transfer";
pub const BITRATE_COLUMN: &str = "Bitrate";

/// Label shown on a test's charts and on its summary bar
pub fn display_title(index: usize, protocol: Protocol, role: Role) -> String {
    format!("test #{} - {} ({})", index + 1, protocol, role)
}

/// Per-interval samples of one test, with the trailing sample removed
#[derive(Debug, Clone, PartialEq)]
pub struct TestSeries {
    pub title: String,
    /// End of each interval, in seconds
    pub time: Vec<f64>,
    pub transfer: Vec<Quantity>,
    pub bitrate: Vec<Quantity>,
}

impl TestSeries {
    /// Build the series for a record
    ///
    /// iperf3's last interval is usually a short partial one, so the final
    /// sample of every column is dropped.
    pub fn from_record(title: &str, record: &TestRecord) -> Result<Self> {
        let mut time = column(title, record, INTERVAL_COLUMN)?
            .iter()
            .map(|cell| parse_interval_end(cell))
            .collect::<Result<Vec<_>>>()?;
        let mut transfer = quantities(title, record, TRANSFER_COLUMN)?;
        let mut bitrate = quantities(title, record, BITRATE_COLUMN)?;

        drop_last(&mut time, title, INTERVAL_COLUMN)?;
        drop_last(&mut transfer, title, TRANSFER_COLUMN)?;
        drop_last(&mut bitrate, title, BITRATE_COLUMN)?;

        Ok(Self {
            title: title.to_string(),
            time,
            transfer,
            bitrate,
        })
    }

    /// `(seconds, bytes)` points
    pub fn transfer_points(&self) -> Vec<(f64, f64)> {
        zip_points(&self.time, &self.transfer)
    }

    /// `(seconds, bits/sec)` points
    pub fn bitrate_points(&self) -> Vec<(f64, f64)> {
        zip_points(&self.time, &self.bitrate)
    }
}

/// One bar per test in each of the two summary charts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub labels: Vec<String>,
    pub transfer: Vec<Quantity>,
    pub bitrate: Vec<Quantity>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a test's first summary Transfer and Bitrate values
    pub fn push_record(&mut self, title: &str, record: &TestRecord) -> Result<()> {
        let transfer = first_summary_value(title, record, TRANSFER_COLUMN)?;
        let bitrate = first_summary_value(title, record, BITRATE_COLUMN)?;

        self.labels.push(title.to_string());
        self.transfer.push(transfer);
        self.bitrate.push(bitrate);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn column<'a>(title: &str, record: &'a TestRecord, name: &str) -> Result<&'a [String]> {
    record
        .interval_columns
        .get(name)
        .ok_or_else(|| Error::missing_column(title, name))
}

fn quantities(title: &str, record: &TestRecord, name: &str) -> Result<Vec<Quantity>> {
    column(title, record, name)?
        .iter()
        .map(|cell| Quantity::parse(cell))
        .collect()
}

fn drop_last<T>(values: &mut Vec<T>, title: &str, name: &str) -> Result<()> {
    values
        .pop()
        .map(|_| ())
        .ok_or_else(|| Error::empty_series(title, name))
}

fn first_summary_value(title: &str, record: &TestRecord, name: &str) -> Result<Quantity> {
    let values = record
        .summary_columns
        .get(name)
        .ok_or_else(|| Error::missing_column(title, name))?;
    let first = values
        .first()
        .ok_or_else(|| Error::empty_series(title, name))?;
    Quantity::parse(first)
}

fn zip_points(time: &[f64], values: &[Quantity]) -> Vec<(f64, f64)> {
    time.iter()
        .copied()
        .zip(values.iter().map(|q| q.value))
        .collect()
}
