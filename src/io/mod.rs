//! I/O module
//!
//! Handles call-script parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, value units, reports)
//! - `sync_reader` - Synchronous call-script reader with iterator interface
//! - `async_reader` - Asynchronous call-script reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_csv_call, parse_payload, parse_value, write_balances_csv, write_events_csv,
    write_report, write_summary_csv, CsvCall,
};
pub use sync_reader::SyncReader;
