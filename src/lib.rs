//! Declarative CSV importing.
//!
//! Describe the columns a CSV file should have, how each one parses,
//! and what happens to every row; the importer handles reading the
//! data, validating headers, parsing each field and dispatching rows.
//!
//! This library provides tools for:
//! - Declaring named columns bound to CSV headers with per-column
//!   parsing rules, validated at definition time
//! - Parsing fields with a fixed built-in set (`boolean`, `integer`,
//!   `decimal`, `string`, `raw`) or custom closures
//! - Driving an import from a file path, an inline string, or any
//!   reader, with one shared definition across many runs
//! - Injecting dependencies that custom parsers and row processors
//!   look up by name and type
//! - Reporting failures with the column, row and alternatives needed
//!   to act on them
//!
//! # Example
//!
//! ```
//! use csv_importer::Importer;
//!
//! fn main() -> csv_importer::Result<()> {
//!     let definition = Importer::define("products")
//!         .column("name", "Name", "string")?
//!         .column("price", "Price", "decimal")?
//!         .build();
//!
//!     let mut importer = Importer::new(definition);
//!     importer.set_option("content", "Name,Price\nWidget,$9.99\n")?;
//!
//!     for row in importer.parsed_values()? {
//!         println!("{} costs {}", row.value("name")?, row.value("price")?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli {
    //! Command-line interface components.
    pub mod args;
    pub mod commands;
}
pub mod error;
pub mod importer;
pub mod parsers;
pub mod row;
pub mod schema;
pub mod source;
pub mod value;

// Re-export commonly used types
pub use error::{BoxedError, Error, Result};
pub use importer::{
    Definition, DefinitionBuilder, ImportSummary, Importer, ReaderOptions, RowProcessor,
};
pub use parsers::{BuiltinParser, CustomParser};
pub use row::{Headers, ParsedRow, RawRow, RowContext};
pub use schema::{Column, RESERVED_COLUMN_NAMES, Schema};
pub use source::Source;
pub use value::Value;
