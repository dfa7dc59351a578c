// ABOUTME: CSV normalizer producing one record per data row keyed by the header
// ABOUTME: Synthesizes placeholder names for empty header cells

use std::collections::HashSet;
use tracing::debug;

use super::error::{NormalizeError, Result};
use crate::value::{Record, Value};

/// Parser settings for delimited input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Column names taken from the first row, with every name unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvHeader {
    columns: Vec<String>,
}

impl CsvHeader {
    /// Build a header from raw cells. Empty cells get `col-NN` names from
    /// their position; a name already used in the header gets a `_N` suffix.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let raw: Vec<&str> = fields.into_iter().collect();
        let mut taken: HashSet<String> = raw
            .iter()
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
            .collect();

        let columns = raw
            .iter()
            .enumerate()
            .map(|(index, name)| {
                if !name.is_empty() {
                    return name.to_string();
                }
                let base = placeholder_name(index);
                let mut candidate = base.clone();
                let mut suffix = 1;
                while taken.contains(&candidate) {
                    candidate = format!("{}_{}", base, suffix);
                    suffix += 1;
                }
                taken.insert(candidate.clone());
                candidate
            })
            .collect();

        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Key the fields of one row by column name. Fields past the header
    /// width are dropped; columns past the row's width are left out.
    pub fn record<'a, I>(&self, fields: I) -> Record
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut record = Record::with_capacity(self.columns.len());
        for (name, field) in self.columns.iter().zip(fields) {
            record.insert(name.clone(), Value::from(field));
        }
        record
    }
}

/// Placeholder key for an empty header cell at `index`.
pub fn placeholder_name(index: usize) -> String {
    format!("col-{:02}", index)
}

/// Parse delimited text into a list of records, one per row after the header.
pub fn parse_csv(input: &[u8], options: &CsvOptions) -> Result<Value> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(input);

    let mut records = reader.records();
    let header = match records.next() {
        Some(row) => {
            let row = row?;
            CsvHeader::from_fields(row.iter())
        }
        None => return Err(NormalizeError::Empty),
    };
    debug!("CSV header has {} columns: {:?}", header.len(), header.columns());

    let rows = records
        .map(|row| row.map(|row| Value::Record(header.record(row.iter()))))
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

    debug!("CSV input normalized into {} records", rows.len());
    Ok(Value::List(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<Record> {
        parse_csv(input.as_bytes(), &CsvOptions::default())
            .unwrap()
            .as_list()
            .unwrap()
            .iter()
            .map(|row| row.as_record().unwrap().clone())
            .collect()
    }

    #[test]
    fn test_rows_keyed_by_header() {
        let rows = parse("name,age\nAlice,30\nBob,41\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], Value::from("Alice"));
        assert_eq!(rows[0]["age"], Value::from("30"));
        assert_eq!(rows[1]["name"], Value::from("Bob"));

        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, vec!["name", "age"]);
    }

    #[test]
    fn test_values_stay_strings() {
        let rows = parse("n,flag\n42,true\n");
        assert_eq!(rows[0]["n"], Value::from("42"));
        assert_eq!(rows[0]["flag"], Value::from("true"));
    }

    #[test]
    fn test_short_row_omits_missing_keys() {
        let rows = parse("a,b,c\n1\n");
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[0]["a"], Value::from("1"));
        assert!(!rows[0].contains_key("b"));
        assert!(!rows[0].contains_key("c"));
    }

    #[test]
    fn test_long_row_drops_extra_fields() {
        let rows = parse("a,b\n1,2,3,4\n");
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0]["b"], Value::from("2"));
    }

    #[test]
    fn test_trailing_empty_field_is_present() {
        let rows = parse("name,age\nBob,\n");
        assert_eq!(rows[0]["age"], Value::from(""));
    }

    #[test]
    fn test_empty_header_placeholder() {
        let header = CsvHeader::from_fields(["a", "", "c", ""]);
        assert_eq!(header.columns(), ["a", "col-01", "c", "col-03"]);
    }

    #[test]
    fn test_placeholder_avoids_existing_names() {
        let header = CsvHeader::from_fields(["col-01", "", "col-01_1"]);
        assert_eq!(header.columns(), ["col-01", "col-01_2", "col-01_1"]);
    }

    #[test]
    fn test_placeholder_is_stable_across_runs() {
        let first = parse("a,,c\n1,2,3\n");
        let second = parse("a,,c\n1,2,3\n");
        assert_eq!(first, second);
        assert_eq!(first[0]["col-01"], Value::from("2"));
    }

    #[test]
    fn test_header_only_yields_empty_list() {
        let value = parse_csv(b"a,b\n", &CsvOptions::default()).unwrap();
        assert_eq!(value, Value::List(Vec::new()));
    }

    #[test]
    fn test_empty_input_fails() {
        let err = parse_csv(b"", &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::Empty));
    }

    #[test]
    fn test_quoted_fields() {
        let rows = parse("name,quote\n\"Smith, J\",\"said \"\"hi\"\"\"\n");
        assert_eq!(rows[0]["name"], Value::from("Smith, J"));
        assert_eq!(rows[0]["quote"], Value::from("said \"hi\""));
    }

    #[test]
    fn test_custom_delimiter() {
        let options = CsvOptions { delimiter: b';' };
        let value = parse_csv(b"a;b\n1;2\n", &options).unwrap();
        let row = value.as_list().unwrap()[0].as_record().unwrap();
        assert_eq!(row["b"], Value::from("2"));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let err = parse_csv(b"a,b\n\xff\xfe,1\n", &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedCsv(_)));
    }
}
