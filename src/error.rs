//! Error handling for importer definitions and import runs.
//!
//! Every failure mode carries enough context to act on: which column,
//! which row, which header, and what the valid alternatives were.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::RESERVED_COLUMN_NAMES;

/// Result type alias for the CSV importer
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error type returned by custom parsers and row processors
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Error types for importer definition, configuration and import runs
#[derive(Error, Debug)]
pub enum Error {
    /// A column was declared with a parser name that is not registered
    #[error(
        "column '{column}' was declared with unknown parser '{parser}'; available parsers are: {}",
        .available.join(", ")
    )]
    UnknownParser {
        column: String,
        parser: String,
        available: Vec<String>,
    },

    /// A column name was declared twice on the same importer
    #[error("a column named '{name}' is already defined; column names must be unique")]
    DuplicateColumn { name: String },

    /// A column was declared with a name the importer reserves for itself
    #[error(
        "'{name}' cannot be used as a column name; reserved names are: {}",
        RESERVED_COLUMN_NAMES.join(", ")
    )]
    ReservedColumnName { name: String },

    /// A column was declared without the CSV header it reads from
    #[error("column '{column}' has no source header; every column needs the header it reads from")]
    MissingHeader { column: String },

    /// An import was started with no CSV source assigned
    #[error(
        "no CSV source is assigned to importer '{importer}'; provide a file path, inline content, or reader before importing"
    )]
    MissingCsv { importer: String },

    /// A path source points at a file that does not exist
    #[error(
        "no CSV file exists at '{}'; single-line strings are treated as file paths, so one line of inline content needs a trailing newline or an explicit content source",
        .path.display()
    )]
    NonexistentCsvFile { path: PathBuf },

    /// The CSV data itself could not be tokenized
    #[error("malformed CSV data: {message}")]
    InvalidCsv { message: String },

    /// The CSV header row lacks headers that declared columns read from
    #[error(
        "the CSV is missing column(s) with header(s) {}; the file has these headers: {}",
        quoted(.missing),
        quoted(.found)
    )]
    MissingColumn {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// An import was started on a definition with no row processor
    #[error(
        "importer '{importer}' has no row processor; define what should happen to each row before importing"
    )]
    UndefinedRowProcessor { importer: String },

    /// A declared dependency was never assigned a value
    #[error(
        "importer '{importer}' uses the '{dependency}' dependency, but no value was assigned for it"
    )]
    MissingDependency { importer: String, dependency: String },

    /// A dependency value was assigned under a name the definition never declared
    #[error(
        "importer '{importer}' does not declare a dependency named '{dependency}'; declared dependencies are: {}",
        listed(.declared)
    )]
    UnknownDependency {
        importer: String,
        dependency: String,
        declared: Vec<String>,
    },

    /// A dependency was requested as a different type than it was assigned with
    #[error("dependency '{dependency}' on importer '{importer}' does not hold a value of type {expected}")]
    DependencyType {
        importer: String,
        dependency: String,
        expected: &'static str,
    },

    /// An option was set under a name the importer does not understand
    #[error(
        "unrecognized option '{option}'; CSV data is supplied with 'path' or 'content', reader options are 'delimiter', 'quote', 'flexible' and 'comment'{}",
        dependency_note(.dependencies)
    )]
    UnrecognizedOption {
        option: String,
        dependencies: Vec<String>,
    },

    /// An option was set to a value it cannot take
    #[error("invalid value '{value}' for option '{option}'; expected {expected}")]
    InvalidOptionValue {
        option: String,
        value: String,
        expected: &'static str,
    },

    /// A parsed row was asked for a column the definition never declared
    #[error(
        "no column named '{name}' is defined; defined columns are: {}",
        listed(.declared)
    )]
    UnknownColumn { name: String, declared: Vec<String> },

    /// A field could not be parsed as a decimal
    #[error("'{value}' in column '{column}' on row {row} cannot be parsed as a decimal")]
    InvalidDecimal {
        column: String,
        row: usize,
        value: String,
    },

    /// A custom parser returned an error for a field
    #[error("the parser for column '{column}' failed on row {row}: {source}")]
    CustomParse {
        column: String,
        row: usize,
        #[source]
        source: BoxedError,
    },

    /// The row processor returned an error for a row
    #[error("the row processor failed on row {row}: {source}")]
    RowProcessor {
        row: usize,
        #[source]
        source: BoxedError,
    },

    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an unknown parser error listing the parsers that would have worked
    pub fn unknown_parser(
        column: impl Into<String>,
        parser: impl Into<String>,
        available: Vec<String>,
    ) -> Self {
        Self::UnknownParser {
            column: column.into(),
            parser: parser.into(),
            available,
        }
    }

    /// Create a duplicate column error
    pub fn duplicate_column(name: impl Into<String>) -> Self {
        Self::DuplicateColumn { name: name.into() }
    }

    /// Create a reserved column name error
    pub fn reserved_column_name(name: impl Into<String>) -> Self {
        Self::ReservedColumnName { name: name.into() }
    }

    /// Create a missing header error
    pub fn missing_header(column: impl Into<String>) -> Self {
        Self::MissingHeader {
            column: column.into(),
        }
    }

    /// Create a missing CSV source error
    pub fn missing_csv(importer: impl Into<String>) -> Self {
        Self::MissingCsv {
            importer: importer.into(),
        }
    }

    /// Create a nonexistent CSV file error
    pub fn nonexistent_csv_file(path: impl Into<PathBuf>) -> Self {
        Self::NonexistentCsvFile { path: path.into() }
    }

    /// Create a malformed CSV error
    pub fn invalid_csv(message: impl Into<String>) -> Self {
        Self::InvalidCsv {
            message: message.into(),
        }
    }

    /// Create a missing column error from the headers that were not found
    pub fn missing_column(missing: Vec<String>, found: Vec<String>) -> Self {
        Self::MissingColumn { missing, found }
    }

    /// Create an undefined row processor error
    pub fn undefined_row_processor(importer: impl Into<String>) -> Self {
        Self::UndefinedRowProcessor {
            importer: importer.into(),
        }
    }

    /// Create a missing dependency error
    pub fn missing_dependency(importer: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self::MissingDependency {
            importer: importer.into(),
            dependency: dependency.into(),
        }
    }

    /// Create an unknown dependency error listing the declared names
    pub fn unknown_dependency(
        importer: impl Into<String>,
        dependency: impl Into<String>,
        declared: Vec<String>,
    ) -> Self {
        Self::UnknownDependency {
            importer: importer.into(),
            dependency: dependency.into(),
            declared,
        }
    }

    /// Create a dependency type mismatch error
    pub fn dependency_type(
        importer: impl Into<String>,
        dependency: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::DependencyType {
            importer: importer.into(),
            dependency: dependency.into(),
            expected,
        }
    }

    /// Create an unrecognized option error listing the declared dependencies
    pub fn unrecognized_option(option: impl Into<String>, dependencies: Vec<String>) -> Self {
        Self::UnrecognizedOption {
            option: option.into(),
            dependencies,
        }
    }

    /// Create an invalid option value error
    pub fn invalid_option_value(
        option: impl Into<String>,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidOptionValue {
            option: option.into(),
            value: value.into(),
            expected,
        }
    }

    /// Create an unknown column error listing the defined columns
    pub fn unknown_column(name: impl Into<String>, declared: Vec<String>) -> Self {
        Self::UnknownColumn {
            name: name.into(),
            declared,
        }
    }

    /// Create an invalid decimal error
    pub fn invalid_decimal(column: impl Into<String>, row: usize, value: impl Into<String>) -> Self {
        Self::InvalidDecimal {
            column: column.into(),
            row,
            value: value.into(),
        }
    }

    /// Create a custom parser failure error
    pub fn custom_parse(column: impl Into<String>, row: usize, source: BoxedError) -> Self {
        Self::CustomParse {
            column: column.into(),
            row,
            source,
        }
    }

    /// Create a row processor failure error
    pub fn row_processor(row: usize, source: BoxedError) -> Self {
        Self::RowProcessor { row, source }
    }
}

// I/O failures inside the csv reader surface as Io; everything else the
// reader reports is a tokenization problem with the data itself.
impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        let message = error.to_string();
        match error.into_kind() {
            csv::ErrorKind::Io(source) => Self::Io { source },
            _ => Self::InvalidCsv { message },
        }
    }
}

fn quoted(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("'{item}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn listed(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn dependency_note(dependencies: &[String]) -> String {
    if dependencies.is_empty() {
        String::new()
    } else {
        format!(
            "; dependencies can be assigned under: {}",
            dependencies.join(", ")
        )
    }
}
