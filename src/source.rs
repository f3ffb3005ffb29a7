//! Where the CSV bytes come from.
//!
//! A source is a file path, an inline content string, or an arbitrary
//! reader. Strings convert with a small heuristic: anything containing
//! a line break is inline content, a single line is a file path. Paths
//! are checked for existence as soon as they are assigned, so a typo'd
//! filename fails at assignment rather than at import.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A CSV data source for an import run
pub enum Source {
    /// Read from a file on disk, opened fresh for every run
    Path(PathBuf),
    /// Read from an in-memory string, reusable across runs
    Content(String),
    /// Read from an arbitrary reader, consumed by the first run
    Reader(Box<dyn Read + Send>),
}

impl Source {
    /// A source reading from a file path
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Source::Path(path.into())
    }

    /// A source reading from an inline string
    pub fn content(content: impl Into<String>) -> Self {
        Source::Content(content.into())
    }

    /// A source reading from any reader
    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Source::Reader(Box::new(reader))
    }

    /// Checks a path source points at an existing file. Content and
    /// reader sources have nothing to check.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Source::Path(path) = self {
            if !path.is_file() {
                return Err(Error::nonexistent_csv_file(path.as_path()));
            }
        }
        Ok(())
    }

    /// Opens the source in `slot` for one run.
    ///
    /// Path and content sources are put back for later runs. A reader
    /// source is taken out of the slot, so running again without
    /// assigning a new source reports the source as missing.
    pub(crate) fn open(
        slot: &mut Option<Source>,
        importer: &str,
    ) -> Result<Box<dyn Read + Send>> {
        match slot.take() {
            None => Err(Error::missing_csv(importer)),
            Some(Source::Reader(reader)) => Ok(reader),
            Some(Source::Path(path)) => {
                let opened = File::open(&path).map_err(|error| match error.kind() {
                    io::ErrorKind::NotFound => Error::nonexistent_csv_file(&path),
                    _ => Error::from(error),
                });
                *slot = Some(Source::Path(path));
                Ok(Box::new(opened?))
            }
            Some(Source::Content(content)) => {
                let reader = Cursor::new(content.clone().into_bytes());
                *slot = Some(Source::Content(content));
                Ok(Box::new(reader))
            }
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Source::Content(content) => write!(f, "Content({} bytes)", content.len()),
            Source::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<&str> for Source {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<String> for Source {
    fn from(value: String) -> Self {
        if value.contains('\n') || value.contains('\r') {
            Source::Content(value)
        } else {
            Source::Path(PathBuf::from(value))
        }
    }
}

impl From<&Path> for Source {
    fn from(value: &Path) -> Self {
        Source::Path(value.to_path_buf())
    }
}

impl From<PathBuf> for Source {
    fn from(value: PathBuf) -> Self {
        Source::Path(value)
    }
}

impl From<File> for Source {
    fn from(value: File) -> Self {
        Source::Reader(Box::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn read_all(mut reader: Box<dyn Read + Send>) -> String {
        let mut buffer = String::new();
        reader.read_to_string(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_single_line_strings_become_paths() {
        assert!(matches!(Source::from("data.csv"), Source::Path(_)));
        assert!(matches!(
            Source::from("exports/products.csv".to_string()),
            Source::Path(_)
        ));
    }

    #[test]
    fn test_strings_with_line_breaks_become_content() {
        assert!(matches!(Source::from("a,b\n1,2\n"), Source::Content(_)));
        assert!(matches!(Source::from("a,b\r\n1,2"), Source::Content(_)));
        assert!(matches!(Source::from("one line\n"), Source::Content(_)));
    }

    #[test]
    fn test_validate_rejects_missing_files() {
        let source = Source::path("definitely/not/here.csv");
        let error = source.validate().unwrap_err();
        assert!(matches!(error, Error::NonexistentCsvFile { .. }));
    }

    #[test]
    fn test_validate_accepts_content_and_readers() {
        assert!(Source::content("a,b\n").validate().is_ok());
        assert!(Source::reader(Cursor::new(Vec::new())).validate().is_ok());
    }

    #[test]
    fn test_open_empty_slot_reports_missing_csv() {
        let mut slot = None;
        let error = Source::open(&mut slot, "products").err().unwrap();
        assert!(matches!(error, Error::MissingCsv { .. }));
    }

    #[test]
    fn test_content_sources_reopen() {
        let mut slot = Some(Source::content("a,b\n1,2\n"));
        assert_eq!(read_all(Source::open(&mut slot, "t").unwrap()), "a,b\n1,2\n");
        assert_eq!(read_all(Source::open(&mut slot, "t").unwrap()), "a,b\n1,2\n");
    }

    #[test]
    fn test_path_sources_reopen() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "a,b").unwrap();
        writeln!(file, "1,2").unwrap();
        let mut slot = Some(Source::path(file.path()));

        assert_eq!(read_all(Source::open(&mut slot, "t").unwrap()), "a,b\n1,2\n");
        assert_eq!(read_all(Source::open(&mut slot, "t").unwrap()), "a,b\n1,2\n");
    }

    #[test]
    fn test_reader_sources_are_consumed() {
        let mut slot = Some(Source::reader(Cursor::new(b"a,b\n1,2\n".to_vec())));
        assert_eq!(read_all(Source::open(&mut slot, "t").unwrap()), "a,b\n1,2\n");
        let error = Source::open(&mut slot, "t").err().unwrap();
        assert!(matches!(error, Error::MissingCsv { .. }));
    }

    #[test]
    fn test_open_missing_path_keeps_the_path_assigned() {
        let mut slot = Some(Source::path("vanished.csv"));
        let error = Source::open(&mut slot, "t").err().unwrap();
        assert!(matches!(error, Error::NonexistentCsvFile { .. }));
        assert!(matches!(slot, Some(Source::Path(_))));
    }
}
