//! Common interface of the three feed parsers
//!
//! Each parser makes one synchronous pass over a line-oriented source and
//! files its records into a [`KeyedRecords`] under the feed's join key.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::app::models::{InputKind, KeyedRecords};
use crate::{Error, Result};

pub trait RecordParser {
    /// Record type produced by this parser
    type Record;

    /// Feed handled by this parser, used in errors and log lines
    const KIND: InputKind;

    /// Parse an already opened source
    fn parse_reader<R: BufRead>(&self, reader: R) -> Result<KeyedRecords<Self::Record>>;

    /// Open `path` and parse it
    fn parse_file(&self, path: &Path) -> Result<KeyedRecords<Self::Record>> {
        info!("Start {} input processing: {}", Self::KIND, path.display());

        let file = File::open(path).map_err(|e| {
            Error::io(format!("Failed to open {}", path.display()), e)
        })?;
        let records = self.parse_reader(BufReader::new(file))?;

        debug!(
            "{} input: {} keys, {} records",
            Self::KIND,
            records.key_count(),
            records.record_count()
        );
        info!("Finished {} input processing", Self::KIND);

        Ok(records)
    }
}

/// Read the next line from a source, mapping I/O failures to a parse-site error
pub(crate) fn read_line(
    kind: InputKind,
    line_number: usize,
    line: std::io::Result<String>,
) -> Result<String> {
    line.map_err(|e| Error::io(format!("Failed to read {} input at line {}", kind, line_number), e))
}
