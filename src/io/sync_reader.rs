//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over call requests from a call-script CSV
//! file. Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<CallRequest, LedgerError>` for each CSV row:
//!
//! ```no_run
//! use token_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("calls.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(request) => println!("Replaying call: {:?}", request),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as `ParseError` items carrying the
//!   file line number (the header is line 1)

use crate::io::csv_format::{convert_csv_call, CsvCall};
use crate::types::{CallRequest, LedgerError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous call-script reader
///
/// Reads rows one at a time; memory use does not grow with file size.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: u64,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns)
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the file does not exist, `IoError` for any
    /// other open failure.
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LedgerError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LedgerError::from(e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 1,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<CallRequest, LedgerError>;

    /// Get the next call request from the script
    ///
    /// # Returns
    ///
    /// * `Some(Ok(CallRequest))` - Successfully parsed row
    /// * `Some(Err(LedgerError::ParseError))` - Malformed row with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvCall>();
        let row = deserializer.next()?;
        self.line_num += 1;

        let line = Some(self.line_num);
        Some(match row {
            Ok(csv_call) => convert_csv_call(csv_call).map_err(|e| LedgerError::parse(line, e)),
            Err(e) => Err(LedgerError::parse(line, e.to_string())),
        })
    }
}
