//! Optional helpers built on top of the options model.

pub mod csv;

pub use csv::{CsvColumn, CsvLoadOptions, CsvRecords, parse_csv};
