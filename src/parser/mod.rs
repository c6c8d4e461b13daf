//! iperf3 text log parser
//!
//! A line-at-a-time state machine. Each test block in the log looks like:
//!
//! ```text
//! Server listening on 5201 (test #1)          <- optional label
//! [ ID] Interval           Transfer     Bitrate
//! [  5]   0.00-1.00   sec   114 MBytes   957 Mbits/sec
//! ...
//! - - - - - - - - - - - - - - - - - - - - - - - - -
//! [ ID] Interval           Transfer     Bitrate
//! [  5]   0.00-10.00  sec  1.10 GBytes   943 Mbits/sec    receiver
//! ```
//!
//! The parser is forgiving: short rows are truncated and rows it cannot use
//! are skipped. It never fails.

mod record;

pub use record::{Columns, Role, TestRecord};

use regex::Regex;
use std::sync::LazyLock;

/// First parenthesized fragment on a line, e.g. `(test #1)`
static TITLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("title pattern is valid"));

/// Token that marks a header row (`[ ID] Interval ...`)
const HEADER_MARKER: &str = "ID";

/// First cell of a row that carries no data
const EMPTY_ROW_SENTINEL: &str = "-";

/// Number of leading tokens (`[`, `5]`) before the first cell
const ROW_PREFIX_TOKENS: usize = 2;

/// Parse a complete log into test records, in input order
pub fn parse(content: &str) -> Vec<TestRecord> {
    let mut parser = LineParser::new();
    for line in content.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

/// Incremental state for [`parse`]
#[derive(Debug, Default)]
pub struct LineParser {
    current: TestRecord,
    title_found: bool,
    header_found: bool,
    summary_header_found: bool,
    records: Vec<TestRecord>,
}

impl LineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line of the log
    pub fn feed_line(&mut self, line: &str) {
        tracing::trace!(line, "parsing line");

        if !self.title_found && !self.header_found {
            self.capture_title(line);
        }

        if !self.header_found {
            if line.contains(HEADER_MARKER) {
                read_header(line, &mut self.current.interval_columns);
                self.header_found = true;
                tracing::debug!(
                    columns = ?self.current.interval_columns.names().collect::<Vec<_>>(),
                    "found interval header"
                );
            }
            return;
        }

        if !self.summary_header_found {
            if line.contains(HEADER_MARKER) {
                read_header(line, &mut self.current.summary_columns);
                self.summary_header_found = true;
                tracing::debug!(
                    columns = ?self.current.summary_columns.names().collect::<Vec<_>>(),
                    "found summary header"
                );
            } else {
                self.read_interval_row(line);
            }
            return;
        }

        self.read_summary_row(line);
        self.finish_record();
    }

    /// Records completed so far
    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    /// Return all completed records
    ///
    /// A block still waiting for its summary row is discarded.
    pub fn finish(self) -> Vec<TestRecord> {
        if self.header_found {
            tracing::debug!("dropping incomplete test block at end of input");
        }
        self.records
    }

    fn capture_title(&mut self, line: &str) {
        // Trailing summary rows (`receiver`) land here after the block closes
        if is_table_row(line) {
            return;
        }
        if let Some(m) = TITLE_PATTERN.find(line) {
            self.current.title = Some(m.as_str().to_string());
            self.current.role = Role::Server;
            self.title_found = true;
        }
    }

    fn read_interval_row(&mut self, line: &str) {
        let values = row_values(line);
        match values.first() {
            None => {
                tracing::debug!(line, "skipping row without values");
                return;
            }
            Some(first) if *first == EMPTY_ROW_SENTINEL => {
                tracing::debug!(line, "skipping sentinel row");
                return;
            }
            Some(_) => {}
        }

        let mut pairs = values.chunks_exact(2);
        for column in self.current.interval_columns.values_mut() {
            match pairs.next() {
                Some(pair) => column.push(pair.join(" ")),
                None => break,
            }
        }
    }

    fn read_summary_row(&mut self, line: &str) {
        let values = row_values(line);
        let mut chunks = values.chunks(2);
        for column in self.current.summary_columns.values_mut() {
            match chunks.next() {
                Some(chunk) => column.push(chunk.join(" ")),
                None => break,
            }
        }
    }

    fn finish_record(&mut self) {
        self.title_found = false;
        self.header_found = false;
        self.summary_header_found = false;

        let record = std::mem::take(&mut self.current);
        tracing::debug!(title = record.title_or_undefined(), "completed test block");
        self.records.push(record);
    }
}

/// Rows of an iperf3 table start with the `[  5]` stream id
fn is_table_row(line: &str) -> bool {
    line.trim_start().starts_with('[')
}

/// Whitespace tokens after the row prefix
fn row_values(line: &str) -> Vec<&str> {
    line.split_whitespace().skip(ROW_PREFIX_TOKENS).collect()
}

fn read_header(line: &str, columns: &mut Columns) {
    for name in row_values(line) {
        columns.insert_empty(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVER_TCP: &str = "\
-----------------------------------------------------------
Server listening on 5201 (test #1)
-----------------------------------------------------------
Accepted connection from 10.0.0.2, port 50530
[  5] local 10.0.0.1 port 5201 connected to 10.0.0.2 port 50532
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108 MBytes   905 Mbits/sec
[  5]   1.00-2.00   sec   112 MBytes   940 Mbits/sec
[  5]   2.00-3.00   sec   112 MBytes   941 Mbits/sec
[  5]   3.00-3.04   sec  4.38 MBytes   938 Mbits/sec
- - - - - - - - - - - - - - - - - - - - - - - - -
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-3.04   sec   336 MBytes   928 Mbits/sec                  receiver
";

    #[test]
    fn test_single_block() {
        let records = parse(SERVER_TCP);
        assert_eq!(records.len(), 1);

        let rec = &records[0];
        assert_eq!(rec.title.as_deref(), Some("(test #1)"));
        assert_eq!(rec.role, Role::Server);
        assert_eq!(rec.interval_columns.len(), 3);
        for (_, values) in rec.interval_columns.iter() {
            assert_eq!(values.len(), 4);
        }
        for (_, values) in rec.summary_columns.iter() {
            assert_eq!(values.len(), 1);
        }
        assert_eq!(
            rec.interval_columns.get("Interval").unwrap()[0],
            "0.00-1.00 sec"
        );
        assert_eq!(
            rec.interval_columns.get("Bitrate").unwrap()[3],
            "938 Mbits/sec"
        );
        assert_eq!(rec.summary_columns.get("Transfer").unwrap()[0], "336 MBytes");
    }

    #[test]
    fn test_column_order_matches_header() {
        let records = parse(SERVER_TCP);
        let names: Vec<_> = records[0].interval_columns.names().collect();
        assert_eq!(names, vec!["Interval", "Transfer", "Bitrate"]);
        let names: Vec<_> = records[0].summary_columns.names().collect();
        assert_eq!(names, vec!["Interval", "Transfer", "Bitrate"]);
    }

    #[test]
    fn test_sentinel_row_is_skipped() {
        let log = "\
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108 MBytes   905 Mbits/sec
[  5]   -   -   -
[  5]   1.00-2.00   sec   112 MBytes   940 Mbits/sec
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-2.00   sec   220 MBytes   922 Mbits/sec
";
        let records = parse(log);
        assert_eq!(records[0].interval_columns.get("Interval").unwrap().len(), 2);
    }

    #[test]
    fn test_short_row_is_truncated() {
        let log = "\
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108 MBytes
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108 MBytes   905 Mbits/sec
";
        let rec = &parse(log)[0];
        assert_eq!(rec.interval_columns.get("Interval").unwrap().len(), 1);
        assert_eq!(rec.interval_columns.get("Transfer").unwrap().len(), 1);
        assert!(rec.interval_columns.get("Bitrate").unwrap().is_empty());
    }

    #[test]
    fn test_odd_token_is_not_a_value() {
        let log = "\
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108 MBytes   905 Mbits/sec
";
        let rec = &parse(log)[0];
        assert_eq!(rec.interval_columns.get("Interval").unwrap().len(), 1);
        assert!(rec.interval_columns.get("Transfer").unwrap().is_empty());
    }

    #[test]
    fn test_summary_single_token_fallback() {
        let log = "\
[ ID] Interval           Transfer     Bitrate         Retr
[  5]   0.00-1.00   sec   114 MBytes   957 Mbits/sec    0
[ ID] Interval           Transfer     Bitrate         Retr
[  5]   0.00-10.00  sec  1.10 GBytes   943 Mbits/sec    0             sender
";
        let rec = &parse(log)[0];
        assert_eq!(rec.summary_columns.get("Retr").unwrap(), ["0 sender"]);

        let log = "\
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   114 MBytes   957 Mbits/sec
[ ID] Interval           Transfer     Bitrate         Retr
[  5]   0.00-10.00  sec  1.10 GBytes   943 Mbits/sec    0
";
        let rec = &parse(log)[0];
        assert_eq!(rec.summary_columns.get("Retr").unwrap(), ["0"]);
    }

    #[test]
    fn test_blank_row_before_summary_is_skipped() {
        let log = "\
[ ID] Interval           Transfer     Bitrate

[  5]   0.00-1.00   sec   114 MBytes   957 Mbits/sec
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   114 MBytes   957 Mbits/sec
";
        let records = parse(log);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].interval_columns.get("Transfer").unwrap().len(), 1);
    }

    #[test]
    fn test_two_blocks_do_not_leak() {
        let log = "\
Server listening on 5201 (test #1)
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108 MBytes   905 Mbits/sec
[  5]   1.00-2.00   sec   112 MBytes   940 Mbits/sec
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-2.00   sec   220 MBytes   922 Mbits/sec                  receiver
Server listening on 5201 (test #2)
[ ID] Interval           Transfer     Bitrate         Jitter    Lost/Total Datagrams
[  5]   0.00-1.00   sec   129 KBytes  1.05 Mbits/sec  0.010 ms  0/91 (0%)
[ ID] Interval           Transfer     Bitrate         Jitter    Lost/Total Datagrams
[  5]   0.00-1.00   sec   129 KBytes  1.05 Mbits/sec  0.010 ms  0/91 (0%)  receiver
";
        let records = parse(log);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].title.as_deref(), Some("(test #1)"));
        assert_eq!(records[1].title.as_deref(), Some("(test #2)"));

        let first: Vec<_> = records[0].interval_columns.names().collect();
        let second: Vec<_> = records[1].interval_columns.names().collect();
        assert_eq!(first, vec!["Interval", "Transfer", "Bitrate"]);
        assert_eq!(
            second,
            vec!["Interval", "Transfer", "Bitrate", "Jitter", "Lost/Total", "Datagrams"]
        );
        assert_eq!(records[1].interval_columns.get("Interval").unwrap().len(), 1);
        assert_eq!(
            records[1].interval_columns.get("Jitter").unwrap()[0],
            "0.010 ms"
        );
    }

    #[test]
    fn test_client_block_has_no_title() {
        let log = "\
Connecting to host 10.0.0.1, port 5201
[  5] local 10.0.0.2 port 50532 connected to 10.0.0.1 port 5201
[ ID] Interval           Transfer     Bitrate         Total Datagrams
[  5]   0.00-1.00   sec   129 KBytes  1.05 Mbits/sec  91
[  5]   1.00-2.00   sec   128 KBytes  1.05 Mbits/sec  90
- - - - - - - - - - - - - - - - - - - - - - - - -
[ ID] Interval           Transfer     Bitrate         Jitter    Lost/Total Datagrams
[  5]   0.00-2.00   sec   257 KBytes  1.05 Mbits/sec  0.000 ms  0/181 (0%)  sender
";
        let records = parse(log);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, None);
        assert_eq!(records[0].role, Role::Client);
        assert_eq!(records[0].title_or_undefined(), "undefined");
    }

    #[test]
    fn test_role_is_per_record() {
        let log = "\
Server listening on 5201 (test #1)
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108 MBytes   905 Mbits/sec
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108 MBytes   905 Mbits/sec
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108 MBytes   905 Mbits/sec
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108 MBytes   905 Mbits/sec
";
        let records = parse(log);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].role, Role::Server);
        assert_eq!(records[1].role, Role::Client);
    }

    #[test]
    fn test_receiver_row_does_not_title_next_block() {
        let run = "\
Connecting to host 10.0.0.1, port 5201
[  5] local 10.0.0.2 port 50532 connected to 10.0.0.1 port 5201
[ ID] Interval           Transfer     Bitrate         Total Datagrams
[  5]   0.00-1.00   sec   129 KBytes  1.05 Mbits/sec  91
[  5]   1.00-2.00   sec   128 KBytes  1.05 Mbits/sec  90
- - - - - - - - - - - - - - - - - - - - - - - - -
[ ID] Interval           Transfer     Bitrate         Jitter    Lost/Total Datagrams
[  5]   0.00-2.00   sec   257 KBytes  1.05 Mbits/sec  0.000 ms  0/181 (0%)  sender
[  5]   0.00-2.00   sec   257 KBytes  1.05 Mbits/sec  0.012 ms  0/181 (0%)  receiver

iperf Done.
";
        let records = parse(&format!("{run}{run}"));
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.title, None);
            assert_eq!(record.role, Role::Client);
            assert_eq!(record.summary_columns.get("Datagrams").unwrap(), ["sender"]);
        }
    }

    #[test]
    fn test_table_rows_are_not_titles() {
        assert!(is_table_row("[  5]   0.00-2.00   sec   0/181 (0%)  receiver"));
        assert!(is_table_row("  [SUM]   0.00-1.00   sec"));
        assert!(!is_table_row("Server listening on 5201 (test #1)"));
    }

    #[test]
    fn test_incomplete_block_is_dropped() {
        let log = "\
[ ID] Interval           Transfer     Bitrate
[  5]   0.00-1.00   sec   108 MBytes   905 Mbits/sec
";
        assert!(parse(log).is_empty());

        let mut parser = LineParser::new();
        for line in log.lines() {
            parser.feed_line(line);
        }
        assert!(parser.records().is_empty());
    }

    #[test]
    fn test_no_header_yields_nothing() {
        assert!(parse("iperf3: error - unable to connect to server\n").is_empty());
        assert!(parse("").is_empty());
    }
}
