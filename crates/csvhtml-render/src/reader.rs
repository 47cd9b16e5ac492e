//! Delimited-text reader.

use crate::config::InputSource;
use crate::error::{RenderError, Result};

use csv::{ByteRecord, ReaderBuilder};
use std::fs::File;
use std::io::{self, BufReader, Read};
use tracing::trace;

/// One parsed record.
pub type Row = Vec<String>;

/// Parsed input: an optional header plus body rows in input order.
///
/// Rows keep exactly the fields they were parsed with; no padding to the
/// header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Option<Row>,
    pub rows: Vec<Row>,
}

/// Open the input for reading. The returned handle is dropped by the caller
/// when the render finishes, on success and on error alike.
pub fn open_input(source: &InputSource) -> Result<Box<dyn Read>> {
    match source {
        InputSource::Stdin => Ok(Box::new(io::stdin().lock())),
        InputSource::File(path) => {
            let file = File::open(path).map_err(|source| RenderError::OpenInput {
                path: path.clone(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Parse delimited text into a [`Table`].
///
/// With `header` set the first record becomes the header and empty input is
/// an error. Any read failure discards everything read so far.
///
/// Fields are decoded lossily: bytes that are not valid UTF-8 (a Latin-1
/// export, say) become U+FFFD instead of failing the render.
pub fn read_table<R: Read>(input: R, delimiter: u8, header: bool) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut record = ByteRecord::new();
    let mut table = Table::default();

    if header {
        match reader.read_byte_record(&mut record) {
            Ok(true) => table.header = Some(to_row(&record)),
            Ok(false) => return Err(RenderError::MissingHeader),
            Err(e) => return Err(RenderError::ReadHeader(e)),
        }
    }

    loop {
        match reader.read_byte_record(&mut record) {
            Ok(true) => table.rows.push(to_row(&record)),
            Ok(false) => break,
            Err(source) => {
                let record = table.rows.len() as u64 + u64::from(header) + 1;
                return Err(RenderError::ReadRow { record, source });
            }
        }
    }

    trace!(
        rows = table.rows.len(),
        header = table.header.is_some(),
        "table parsed"
    );
    Ok(table)
}

fn to_row(record: &ByteRecord) -> Row {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}
