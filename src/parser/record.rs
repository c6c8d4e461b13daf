//! Parsed test records

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Which side of the iperf3 connection produced a test block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The block carried a `(test #N)` label, printed by `iperf3 -s`
    Server,
    #[default]
    Client,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Server => write!(f, "Server"),
            Role::Client => write!(f, "Client"),
        }
    }
}

/// Insertion-ordered mapping from column name to raw cell values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    entries: Vec<(String, Vec<String>)>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty column, or empty an existing one in place
    pub fn insert_empty(&mut self, name: &str) {
        match self.position(name) {
            Some(idx) => self.entries[idx].1.clear(),
            None => self.entries.push((name.to_string(), Vec::new())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|idx| self.entries[idx].1.as_slice())
    }

    /// Column names in header order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut Vec<String>> {
        self.entries.iter_mut().map(|(_, values)| values)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}

impl Serialize for Columns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, values) in &self.entries {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

/// One iperf3 test run: an interval table closed by a summary row
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct TestRecord {
    /// Parenthesized label seen before the block's first header, e.g. `(test #1)`
    pub title: Option<String>,
    pub role: Role,
    pub interval_columns: Columns,
    pub summary_columns: Columns,
}

impl TestRecord {
    /// Title as printed in progress output
    pub fn title_or_undefined(&self) -> &str {
        self.title.as_deref().unwrap_or("undefined")
    }
}
