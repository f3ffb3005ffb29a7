//! One pass over a CSV source.
//!
//! An [`ImportRun`] owns the open reader for the duration of a single
//! run: it checks dependencies, opens the source, validates headers up
//! front, and then yields parsed rows one at a time. Dropping the run
//! releases the underlying reader.

use std::io::Read;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::row::{DependencyMap, Headers, ParsedRow, RawRow, RowContext};
use crate::source::Source;

use super::{Definition, ReaderOptions};

/// What an import run produced: how many rows were dispatched and the
/// headers the file actually had
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Number of data rows parsed and dispatched
    pub rows: usize,
    /// Header names found in the file, in file order
    pub headers: Vec<String>,
}

/// A single in-progress pass over the CSV source
pub(crate) struct ImportRun<'a> {
    definition: &'a Definition,
    dependencies: &'a DependencyMap,
    reader: csv::Reader<Box<dyn Read + Send>>,
    headers: Arc<Headers>,
    record: csv::StringRecord,
    row_number: usize,
}

impl<'a> ImportRun<'a> {
    /// Runs every pre-flight check in order: declared dependencies are
    /// assigned, a source is present and opens, and the header row
    /// covers every declared column. Only then is the run ready to
    /// yield rows.
    pub(crate) fn start(
        definition: &'a Definition,
        dependencies: &'a DependencyMap,
        source: &mut Option<Source>,
        options: &ReaderOptions,
    ) -> Result<Self> {
        for name in definition.dependencies() {
            if !dependencies.contains_key(name) {
                return Err(Error::missing_dependency(definition.name(), name));
            }
        }

        let input = Source::open(source, definition.name())?;
        let mut reader = options.reader(input);
        let header_record = reader.headers()?.clone();
        let headers = Arc::new(Headers::from_record(&header_record));
        definition.schema().validate_headers(&headers)?;

        debug!(
            importer = definition.name(),
            columns = definition.schema().len(),
            headers = headers.len(),
            "headers validated"
        );

        Ok(Self {
            definition,
            dependencies,
            reader,
            headers,
            record: csv::StringRecord::new(),
            row_number: 0,
        })
    }

    /// Reads and parses the next data row, `None` at end of input
    pub(crate) fn next_row(&mut self) -> Result<Option<ParsedRow>> {
        if !self.reader.read_record(&mut self.record)? {
            return Ok(None);
        }
        self.row_number += 1;
        trace!(row = self.row_number, "parsing record");

        let raw = RawRow::new(Arc::clone(&self.headers), self.record.clone());
        let context = self.context();
        let parsed = ParsedRow::from_raw(self.definition.schema(), raw, &context)?;
        Ok(Some(parsed))
    }

    /// Context for the most recently read row
    pub(crate) fn context(&self) -> RowContext<'_> {
        RowContext::new(self.definition.name(), self.dependencies, self.row_number)
    }

    /// Header names found in the file
    pub(crate) fn header_names(&self) -> Vec<String> {
        self.headers.names().to_vec()
    }

    /// Closes the run and reports what it covered
    pub(crate) fn finish(self) -> ImportSummary {
        ImportSummary {
            rows: self.row_number,
            headers: self.headers.names().to_vec(),
        }
    }
}
