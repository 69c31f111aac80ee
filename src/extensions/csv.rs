//! Loading series data from CSV text.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::JsValue;
use crate::error::{ChartError, ChartResult};
use crate::options::{DataPoint, Series, SeriesType};

/// CSV dialect used by [`parse_csv`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvLoadOptions {
    pub has_header_row: bool,
    pub delimiter: char,
    pub quote: char,
    pub escape: Option<char>,
    /// Whether a doubled quote inside a quoted field stands for one quote.
    pub double_quote: bool,
    /// Cell text read as `null`. Empty cells are always `null`.
    pub null_text: Option<String>,
}

impl Default for CsvLoadOptions {
    fn default() -> Self {
        Self {
            has_header_row: true,
            delimiter: ',',
            quote: '\'',
            escape: Some('\\'),
            double_quote: false,
            null_text: Some("None".to_owned()),
        }
    }
}

impl CsvLoadOptions {
    #[must_use]
    pub fn with_header_row(mut self, has_header_row: bool) -> Self {
        self.has_header_row = has_header_row;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    #[must_use]
    pub fn with_escape(mut self, escape: Option<char>) -> Self {
        self.escape = escape;
        self
    }

    #[must_use]
    pub fn with_double_quote(mut self, double_quote: bool) -> Self {
        self.double_quote = double_quote;
        self
    }

    #[must_use]
    pub fn with_null_text(mut self, null_text: Option<String>) -> Self {
        self.null_text = null_text;
        self
    }

    fn reader_builder(&self) -> ChartResult<csv::ReaderBuilder> {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(self.has_header_row)
            .delimiter(ascii_byte("delimiter", self.delimiter)?)
            .quote(ascii_byte("quote", self.quote)?)
            .double_quote(self.double_quote)
            .flexible(true);
        if let Some(escape) = self.escape {
            builder.escape(Some(ascii_byte("escape", escape)?));
        }
        Ok(builder)
    }
}

fn ascii_byte(field: &str, ch: char) -> ChartResult<u8> {
    u8::try_from(ch)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| ChartError::invalid_value(field, format!("`{ch}` is not an ASCII character")))
}

/// Column of a CSV record, by header name or by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CsvColumn {
    Name(String),
    Index(usize),
}

impl From<&str> for CsvColumn {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<usize> for CsvColumn {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

/// Parsed CSV: the column names and one map per record.
pub type CsvRecords = (Vec<String>, Vec<IndexMap<String, String>>);

/// Parses `input` into column names and records.
///
/// Without a header row, columns are named by position (`"0"`, `"1"`, ...).
/// Records shorter than the header leave the missing columns out.
pub fn parse_csv(input: &str, options: &CsvLoadOptions) -> ChartResult<CsvRecords> {
    if input.trim().is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let mut reader = options.reader_builder()?.from_reader(input.as_bytes());
    let mut columns: Vec<String> = if options.has_header_row {
        reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|header| header.trim().to_owned())
            .collect()
    } else {
        Vec::new()
    };
    for (index, column) in columns.iter().enumerate() {
        if columns[..index].contains(column) {
            return Err(ChartError::InvalidData(format!(
                "csv header `{column}` appears more than once"
            )));
        }
    }

    let mut records = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        if !options.has_header_row {
            while columns.len() < record.len() {
                columns.push(columns.len().to_string());
            }
        } else if record.len() > columns.len() {
            return Err(ChartError::InvalidData(format!(
                "csv row {} has {} fields but the header has {}",
                row + 1,
                record.len(),
                columns.len()
            )));
        }
        records.push(
            columns
                .iter()
                .zip(record.iter())
                .map(|(column, cell)| (column.clone(), cell.to_owned()))
                .collect(),
        );
    }

    debug!(columns = columns.len(), records = records.len(), "parsed csv");
    Ok((columns, records))
}

fn csv_error(error: csv::Error) -> ChartError {
    ChartError::InvalidData(format!("failed to parse csv: {error}"))
}

fn cell_value(cell: &str, options: &CsvLoadOptions) -> JsValue {
    let trimmed = cell.trim();
    if trimmed.is_empty() || options.null_text.as_deref() == Some(trimmed) {
        return JsValue::Null;
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => JsValue::number(number),
        _ => JsValue::String(cell.to_owned()),
    }
}

impl Series {
    /// Replaces `data` with one object point per CSV record.
    ///
    /// `property_map` pairs a point property such as `x`, `y` or
    /// `marker.radius` with the column it is read from.
    pub fn load_from_csv(
        &mut self,
        input: &str,
        property_map: &[(&str, CsvColumn)],
        options: &CsvLoadOptions,
    ) -> ChartResult<()> {
        if property_map.is_empty() {
            return Err(ChartError::InvalidData(
                "a csv property map needs at least one column".to_owned(),
            ));
        }

        let (columns, records) = parse_csv(input, options)?;
        let resolved = property_map
            .iter()
            .map(|(property, column)| {
                let name = match column {
                    CsvColumn::Name(name) => columns.iter().find(|candidate| *candidate == name),
                    CsvColumn::Index(index) => columns.get(*index),
                };
                name.map(|name| (*property, name.clone())).ok_or_else(|| {
                    ChartError::InvalidData(format!(
                        "csv column {column:?} for `{property}` does not exist"
                    ))
                })
            })
            .collect::<ChartResult<Vec<_>>>()?;

        let mut data = Vec::with_capacity(records.len());
        for record in &records {
            let mut point = JsValue::object();
            for (property, column) in &resolved {
                let value = record
                    .get(column)
                    .map_or(JsValue::Null, |cell| cell_value(cell, options));
                point.set_path(property, value)?;
            }
            if let JsValue::Object(point) = point {
                data.push(DataPoint::Object(point));
            }
        }

        debug!(
            id = self.id.as_deref().unwrap_or(""),
            points = data.len(),
            "loaded series data from csv"
        );
        self.data = Some(data);
        Ok(())
    }

    pub fn from_csv(
        series_type: SeriesType,
        input: &str,
        property_map: &[(&str, CsvColumn)],
        options: &CsvLoadOptions,
    ) -> ChartResult<Self> {
        let mut series = Self::new(series_type);
        series.load_from_csv(input, property_map, options)?;
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::{CsvLoadOptions, parse_csv};

    #[test]
    fn positional_columns_without_header() {
        let options = CsvLoadOptions::default().with_header_row(false);
        let (columns, records) = parse_csv("1,2\n3,4\n", &options).expect("csv");
        assert_eq!(columns, vec!["0", "1"]);
        assert_eq!(records[1]["1"], "4");
    }

    #[test]
    fn quoted_fields_use_single_quotes_by_default() {
        let (_, records) =
            parse_csv("name,value\n'a, b',1\n", &CsvLoadOptions::default()).expect("csv");
        assert_eq!(records[0]["name"], "a, b");
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let options = CsvLoadOptions::default().with_delimiter('→');
        assert!(parse_csv("a→b\n1→2\n", &options).is_err());
    }
}
