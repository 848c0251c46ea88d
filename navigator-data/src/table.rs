//! Header-keyed CSV tables.

use csv::{ReaderBuilder, StringRecord, Trim};
use log::warn;
use navigator_core::{GlobalIndicators, IndicatorRow};

/// A parsed CSV file: the header row and every well-formed data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Header names in column order.
    pub headers: Vec<String>,
    /// Data rows whose field count matches the header.
    pub rows: Vec<Vec<String>>,
    /// Rows dropped because their field count differed from the header.
    pub skipped_rows: usize,
}

impl CsvTable {
    /// Convert the rows into header-keyed indicator rows.
    #[must_use]
    pub fn to_indicators(&self) -> GlobalIndicators {
        self.rows
            .iter()
            .map(|row| IndicatorRow::from_fields(&self.headers, row))
            .collect()
    }
}

/// Parse CSV text with a header row.
///
/// The input is split into lines before tokenising, so a quote never
/// spans a line break. Quoted fields may contain commas and have their
/// quotes removed, and a quote after leading whitespace still opens a
/// quoted field. Fields are trimmed, blank lines are ignored, and rows whose
/// field count differs from the header are skipped with a warning and
/// counted in [`CsvTable::skipped_rows`]. Empty input yields an empty table.
///
/// # Errors
///
/// Returns the reader error when a line is not valid UTF-8 or cannot be
/// tokenised.
///
/// # Examples
///
/// ```
/// use navigator_data::parse_csv;
///
/// let table = parse_csv(b"Country,Year,Score\n\"Tunisia, North\",2020,5.1\n")?;
/// assert_eq!(table.rows, vec![vec!["Tunisia, North", "2020", "5.1"]]);
/// # Ok::<(), csv::Error>(())
/// ```
pub fn parse_csv(bytes: &[u8]) -> Result<CsvTable, csv::Error> {
    let mut table = CsvTable::default();
    let mut header_seen = false;
    for (index, raw) in bytes.split(|byte| *byte == b'\n').enumerate() {
        let line = raw.trim_ascii();
        if line.is_empty() {
            continue;
        }
        let fields = parse_line(line)?;
        if !header_seen {
            table.headers = fields;
            header_seen = true;
            continue;
        }
        if fields.len() == table.headers.len() {
            table.rows.push(fields);
        } else {
            warn!(
                "Skipping malformed CSV line {}: expected {} values, got {}",
                index + 1,
                table.headers.len(),
                fields.len()
            );
            table.skipped_rows += 1;
        }
    }
    Ok(table)
}

fn parse_line(line: &[u8]) -> Result<Vec<String>, csv::Error> {
    let normalised = strip_field_padding(line);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(normalised.as_slice());
    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record.iter().map(str::to_owned).collect())
}

/// Drop whitespace at the start of every unquoted field so that
/// `a, "b, c"` reads as two fields.
fn strip_field_padding(line: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len());
    let mut in_quotes = false;
    let mut field_start = true;
    for &byte in line {
        if field_start && !in_quotes && (byte == b' ' || byte == b'\t') {
            continue;
        }
        field_start = false;
        match byte {
            b'"' => in_quotes = !in_quotes,
            b',' if !in_quotes => field_start = true,
            _ => {}
        }
        out.push(byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn quoted_commas_stay_in_one_field() {
        let table = parse_csv(b"Country,Year,Score\n\"Tunisia, North\",2020,5.1\n")
            .expect("valid csv");
        assert_eq!(table.headers, vec!["Country", "Year", "Score"]);
        assert_eq!(table.rows, vec![vec!["Tunisia, North", "2020", "5.1"]]);
        assert_eq!(table.skipped_rows, 0);
    }

    #[rstest]
    fn short_and_long_rows_are_skipped_and_counted() {
        let input = b"Country,Year,Score\nTunisia,2020\nMorocco,2020,5.0\nEgypt,2020,4.2,extra\n";
        let table = parse_csv(input).expect("valid csv");
        assert_eq!(table.rows, vec![vec!["Morocco", "2020", "5.0"]]);
        assert_eq!(table.skipped_rows, 2);
    }

    #[rstest]
    fn blank_lines_and_padding_are_ignored() {
        let input = b"\n Country , Year \n\n  Tunisia ,  2019 \n   \n";
        let table = parse_csv(input).expect("valid csv");
        assert_eq!(table.headers, vec!["Country", "Year"]);
        assert_eq!(table.rows, vec![vec!["Tunisia", "2019"]]);
        assert_eq!(table.skipped_rows, 0);
    }

    #[rstest]
    #[case(b"")]
    #[case(b"\n\n")]
    fn empty_input_is_an_empty_table(#[case] input: &[u8]) {
        assert_eq!(parse_csv(input).expect("valid csv"), CsvTable::default());
    }

    #[rstest]
    fn rows_become_indicator_rows() {
        let table = parse_csv(b"Country,Year,Inflation\nTunisia,2021,5.7\n").expect("valid csv");
        let indicators = table.to_indicators();
        let row = indicators.latest_for("Tunisia").expect("row present");
        assert_eq!(row.year(), Some(2021));
        assert_eq!(row.number("Inflation"), Some(5.7));
    }

    #[rstest]
    fn a_stray_quote_only_costs_its_own_line() {
        let input = b"Country,Year,Score\nTunisia,\"2020,5.1\nMorocco,2020,5.0\nEgypt,2020,4.2\nFrance,2020,6.0\n";
        let table = parse_csv(input).expect("valid csv");
        assert_eq!(
            table.rows,
            vec![
                vec!["Morocco", "2020", "5.0"],
                vec!["Egypt", "2020", "4.2"],
                vec!["France", "2020", "6.0"],
            ]
        );
        assert_eq!(table.skipped_rows, 1);
    }

    #[rstest]
    #[case(b"Country,City,Score\nEgypt, \"Cairo, X\", 4.2\n")]
    #[case(b"Country,City,Score\r\nEgypt,\t\"Cairo, X\" ,4.2\r\n")]
    fn quotes_after_padding_still_open_a_field(#[case] input: &[u8]) {
        let table = parse_csv(input).expect("valid csv");
        assert_eq!(table.rows, vec![vec!["Egypt", "Cairo, X", "4.2"]]);
        assert_eq!(table.skipped_rows, 0);
    }

    #[rstest]
    fn invalid_utf8_is_an_error() {
        assert!(parse_csv(b"Country\n\xff\xfe\n").is_err());
    }
}
