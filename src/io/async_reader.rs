//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over call requests from a call-script
//! CSV source. Supports batch reading for the async replay strategy.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - futures `AsyncRead` so any compatible source can be read (tokio files
//!   are wrapped with tokio-util's compat layer)
//! - Batch reading to amortize await points
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of Result<CallRequest, LedgerError>
//!                  ↓
//!           csv_format module
//!           (CsvCall, convert_csv_call)
//! ```

use crate::io::csv_format::{convert_csv_call, CsvCall};
use crate::types::{CallRequest, LedgerError};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous call-script reader
///
/// Rows are returned in file order. Malformed rows are kept in the batch as
/// `ParseError` items so callers can log and count them.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing CSV data
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
        }
    }

    /// Read a batch of call requests
    ///
    /// Reads up to `batch_size` rows. Each row yields either a converted
    /// `CallRequest` or a `ParseError` carrying its line number.
    ///
    /// # Returns
    ///
    /// The rows read, in order. An empty vector means end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Result<CallRequest, LedgerError>> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.csv_reader.deserialize::<CsvCall>();

        while batch.len() < batch_size {
            let Some(row) = rows.next().await else {
                break;
            };
            self.line_num += 1;

            let line = Some(self.line_num);
            batch.push(match row {
                Ok(csv_call) => {
                    convert_csv_call(csv_call).map_err(|e| LedgerError::parse(line, e))
                }
                Err(e) => Err(LedgerError::parse(line, e.to_string())),
            });
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountId, Call};
    use futures::io::Cursor;

    const ADMIN: &str = "0x00000000000000000000000000000000000000ad";
    const A: &str = "0x000000000000000000000000000000000000000a";

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let content = format!(
            "caller,op,to,amount,value,data\n\
            {ADMIN},issue,{A},100,,\n\
            {A},transfer,{ADMIN},10,,\n\
            {A},deposit,,,1ether,\n"
        );
        let mut reader = AsyncReader::new(Cursor::new(content.into_bytes()));

        let batch = reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        let first = batch[0].as_ref().unwrap();
        assert_eq!(first.caller, AccountId::from_low_u64(0xad));
        assert!(matches!(first.call, Call::Issue { amount: 100, .. }));
        assert!(matches!(
            batch[1].as_ref().map(|r| &r.call),
            Ok(Call::Transfer { amount: 10, .. })
        ));

        let batch = reader.read_batch(2).await;
        assert_eq!(batch.len(), 1);
        let deposit = batch[0].as_ref().unwrap();
        assert_eq!(deposit.call, Call::Deposit);
        assert_eq!(deposit.value, 1_000_000_000_000_000_000);

        assert!(reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let content = "caller,op,to,amount,value,data\n";
        let mut reader = AsyncReader::new(Cursor::new(content.as_bytes()));

        assert!(reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_keeps_line_numbers_across_batches() {
        let content = format!(
            "caller,op,to,amount,value,data\n\
            {ADMIN},issue,{A},100,,\n\
            {ADMIN},mint,{A},100,,\n\
            {ADMIN},issue,{A},nope,,\n"
        );
        let mut reader = AsyncReader::new(Cursor::new(content.into_bytes()));

        let first = reader.read_batch(2).await;
        assert!(first[0].is_ok());
        assert!(matches!(
            first[1],
            Err(LedgerError::ParseError { line: Some(3), .. })
        ));

        let second = reader.read_batch(2).await;
        assert!(matches!(
            second[0],
            Err(LedgerError::ParseError { line: Some(4), .. })
        ));
    }
}
