//! Physical quantities with SI-prefixed units
//!
//! iperf3 prints values like `128 MBytes` or `957 Mbits/sec`. A [`Quantity`]
//! holds the scaled magnitude (`1.28e8`) and the base unit (`Bytes`), and
//! formats back into the same engineering notation for chart labels.

use crate::common::{Error, Result};

/// Base units that accept an SI prefix
///
/// Anything else is kept verbatim, so `packets` is not read as pico-`ackets`.
const PREFIXABLE_UNITS: &[&str] = &[
    "Bytes", "Byte", "B", "bits/sec", "bits", "bit", "b", "bps", "sec", "s",
];

/// Prefixes used when formatting, from 1e-18 to 1e24 in steps of 1e3
const FORMAT_PREFIXES: &[&str] = &[
    "a", "f", "p", "n", "u", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// Index of the empty prefix in `FORMAT_PREFIXES`
const UNIT_PREFIX_INDEX: i32 = 6;

/// Significant digits kept when formatting
const SIGNIFICANT_DIGITS: i32 = 5;

fn prefix_scale(prefix: char) -> Option<f64> {
    let scale = match prefix {
        'Y' => 1e24,
        'Z' => 1e21,
        'E' => 1e18,
        'P' => 1e15,
        'T' => 1e12,
        'G' => 1e9,
        'M' => 1e6,
        'K' | 'k' => 1e3,
        'm' => 1e-3,
        'u' | 'µ' => 1e-6,
        'n' => 1e-9,
        'p' => 1e-12,
        'f' => 1e-15,
        'a' => 1e-18,
        _ => return None,
    };
    Some(scale)
}

/// A magnitude with its (unprefixed) unit
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl Quantity {
    pub fn with_unit(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
        }
    }

    /// Parse `"<number> <unit>"`, `"<number><unit>"` or a bare number
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let split = trimmed
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+')))
            .map(|(idx, _)| idx)
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        let value: f64 = number
            .parse()
            .map_err(|_| Error::InvalidQuantity(s.to_string()))?;
        let unit = unit.trim();
        if unit.split_whitespace().count() > 1 {
            return Err(Error::InvalidQuantity(s.to_string()));
        }

        let (scale, base) = split_prefix(unit);
        Ok(Self {
            value: value * scale,
            unit: base.to_string(),
        })
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_si(self.value, &self.unit))
    }
}

impl std::str::FromStr for Quantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn split_prefix(unit: &str) -> (f64, &str) {
    let mut chars = unit.chars();
    if let Some(first) = chars.next() {
        let rest = chars.as_str();
        if PREFIXABLE_UNITS.contains(&rest) {
            if let Some(scale) = prefix_scale(first) {
                return (scale, rest);
            }
        }
    }
    (1.0, unit)
}

/// Format a value in engineering notation, e.g. `125 MBytes` or `500 ms`
pub fn format_si(value: f64, unit: &str) -> String {
    let (mantissa, prefix) = if value == 0.0 || !value.is_finite() {
        (value, "")
    } else {
        let exp3 = (value.abs().log10() / 3.0).floor() as i32;
        let max_exp3 = FORMAT_PREFIXES.len() as i32 - 1 - UNIT_PREFIX_INDEX;
        let exp3 = exp3.clamp(-UNIT_PREFIX_INDEX, max_exp3);
        let prefix = FORMAT_PREFIXES[(exp3 + UNIT_PREFIX_INDEX) as usize];
        (value / 10f64.powi(exp3 * 3), prefix)
    };

    let number = format_mantissa(mantissa);
    if unit.is_empty() {
        format!("{number}{prefix}")
    } else {
        format!("{number} {prefix}{unit}")
    }
}

fn format_mantissa(x: f64) -> String {
    if x == 0.0 || !x.is_finite() {
        return format!("{x}");
    }
    let int_digits = (x.abs().log10().floor() as i32 + 1).max(1);
    let decimals = (SIGNIFICANT_DIGITS - int_digits).max(0) as usize;
    let text = format!("{x:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// End of an iperf3 interval cell, in seconds
///
/// `"0.00-1.00 sec"` gives `1.0`.
pub fn parse_interval_end(cell: &str) -> Result<f64> {
    let range = cell
        .split_whitespace()
        .next()
        .ok_or_else(|| Error::InvalidInterval(cell.to_string()))?;
    let (_, end) = range
        .split_once('-')
        .ok_or_else(|| Error::InvalidInterval(cell.to_string()))?;
    end.parse()
        .map_err(|_| Error::InvalidInterval(cell.to_string()))
}
