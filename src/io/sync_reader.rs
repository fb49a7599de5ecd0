//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over ledger commands from a CSV script.
//! Delegates CSV format concerns to the csv_format module.
//!
//! ```no_run
//! use rust_bank_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::open(Path::new("script.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("Command: {:?}", command),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file cannot be opened) are returned from `open()`
//! - Row errors are yielded as `Err` items, tagged with their line number

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerCommand, LedgerError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one row at a time; memory use does not grow with the script.
#[derive(Debug)]
pub struct SyncReader<R: Read = File> {
    reader: csv::Reader<R>,
    record: StringRecord,
}

impl SyncReader<File> {
    /// Open a script file
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        Ok(Self::from_reader(file))
    }
}

impl<R: Read> SyncReader<R> {
    /// Wrap any reader
    ///
    /// Fields are trimmed and rows may omit trailing columns.
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(reader);

        Self {
            reader,
            record: StringRecord::new(),
        }
    }
}

impl<R: Read> Iterator for SyncReader<R> {
    type Item = Result<LedgerCommand, LedgerError>;

    /// Read, deserialize and convert the next row
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => return Some(Err(e.into())),
        }

        // Position of the row itself, not of the reader after it
        let line = self.record.position().map(|position| position.line());
        let csv_record = match self.reader.headers() {
            Ok(headers) => self.record.deserialize::<CsvRecord>(Some(headers)),
            Err(e) => return Some(Err(e.into())),
        };

        Some(
            csv_record
                .map_err(LedgerError::from)
                .and_then(convert_csv_record)
                .map_err(|e| match e {
                    LedgerError::ParseError { message, .. } => {
                        LedgerError::ParseError { line, message }
                    }
                    other => other,
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "command,tax_id,account,amount,name,birth_date,address,kind\n";

    fn reader(body: &str) -> SyncReader<std::io::Cursor<String>> {
        SyncReader::from_reader(std::io::Cursor::new(format!("{}{}", HEADER, body)))
    }

    #[test]
    fn test_reads_commands_in_order() {
        let commands: Vec<_> = reader(
            "new_client,111,,,Ana,15-03-1992,\"Rua A, 1 - Centro\",\n\
             new_account,111,1,,,,,checking\n\
             deposit,111,1,200,,,,\n",
        )
        .collect::<Result<_, _>>()
        .unwrap();

        assert_eq!(commands.len(), 3);
        assert!(matches!(&commands[0], LedgerCommand::NewClient(r) if r.address == "Rua A, 1 - Centro"));
        assert!(matches!(
            commands[2],
            LedgerCommand::Deposit { number: 1, amount, .. } if amount == Decimal::from(200)
        ));
    }

    #[test]
    fn test_short_rows_are_accepted() {
        let commands: Vec<_> = reader("statement,111,1\nnew_account,111\n")
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn test_bad_row_does_not_stop_iteration() {
        let results: Vec<_> = reader(
            "deposit,111,1,abc,,,,\n\
             transfer,111,1,5,,,,\n\
             withdraw,111,1,5,,,,\n",
        )
        .collect();

        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], Err(LedgerError::InvalidAmount { .. })));
        assert!(matches!(
            results[1],
            Err(LedgerError::ParseError { line: Some(3), .. })
        ));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_parse_errors_report_their_own_line() {
        let results: Vec<_> = reader(
            "transfer,111,1,5,,,,\n\
             deposit,111,1,5,,,,\n\
             transfer,111,1,5,,,,\n",
        )
        .collect();

        assert_eq!(
            results[0],
            Err(LedgerError::parse_error(Some(2), "Unknown command 'transfer'"))
        );
        assert!(matches!(
            results[2],
            Err(LedgerError::ParseError { line: Some(4), .. })
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let result = SyncReader::open(Path::new("does-not-exist.csv"));
        assert!(
            matches!(result, Err(LedgerError::IoError { message }) if message.contains("Failed to open file"))
        );
    }

    #[test]
    fn test_open_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}deposit,111,1,5\n", HEADER).unwrap();
        file.flush().unwrap();

        let commands: Vec<_> = SyncReader::open(file.path()).unwrap().collect();

        assert_eq!(commands.len(), 1);
        assert!(commands[0].is_ok());
    }
}
