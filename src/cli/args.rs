//! Command-line argument definitions for the CSV importer
//!
//! The CLI declares columns on the command line with repeated
//! `--column` specs and runs either a full parse or a header check
//! against a file or inline content.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the CSV importer
///
/// Parses CSV data according to column declarations given on the
/// command line, printing parsed rows or validating headers.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "csv_importer",
    version,
    about = "Parse CSV files with declared, typed columns",
    long_about = "Declares named columns with per-column parsing rules and runs them against \
                  a CSV file or inline content. Each column binds a name to a CSV header and \
                  one of the built-in parsers: boolean, integer, decimal, string or raw."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the CSV importer
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse a CSV source and print every parsed row
    Parse(ParseArgs),
    /// Validate that a CSV source has the headers the columns need
    Check(CheckArgs),
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// CSV file to parse
    #[arg(value_name = "FILE", help = "Path of the CSV file to parse")]
    pub path: Option<PathBuf>,

    /// Inline CSV content to parse instead of a file
    #[arg(
        long = "content",
        value_name = "CSV",
        conflicts_with = "path",
        help = "Inline CSV content to parse instead of a file"
    )]
    pub content: Option<String>,

    /// Column declaration as NAME=HEADER:PARSER, repeatable
    ///
    /// NAME is how the parsed value is addressed, HEADER is the CSV
    /// header the column reads from, and PARSER is one of boolean,
    /// integer, decimal, string or raw.
    #[arg(
        short = 'c',
        long = "column",
        value_name = "NAME=HEADER:PARSER",
        required = true,
        help = "Column declaration as NAME=HEADER:PARSER (repeatable)"
    )]
    pub columns: Vec<ColumnSpec>,

    /// Field delimiter, a comma unless given
    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        help = "Field delimiter character"
    )]
    pub delimiter: Option<char>,

    /// Print at most this many rows (all rows are still parsed)
    #[arg(
        short = 'n',
        long = "limit",
        value_name = "COUNT",
        help = "Print at most COUNT rows"
    )]
    pub limit: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ParseArgs {
    /// Map verbosity count to a log level string
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// CSV file to check
    #[arg(value_name = "FILE", help = "Path of the CSV file to check")]
    pub path: Option<PathBuf>,

    /// Inline CSV content to check instead of a file
    #[arg(
        long = "content",
        value_name = "CSV",
        conflicts_with = "path",
        help = "Inline CSV content to check instead of a file"
    )]
    pub content: Option<String>,

    /// Column declaration as NAME=HEADER:PARSER, repeatable
    #[arg(
        short = 'c',
        long = "column",
        value_name = "NAME=HEADER:PARSER",
        required = true,
        help = "Column declaration as NAME=HEADER:PARSER (repeatable)"
    )]
    pub columns: Vec<ColumnSpec>,

    /// Field delimiter, a comma unless given
    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        help = "Field delimiter character"
    )]
    pub delimiter: Option<char>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CheckArgs {
    /// Map verbosity count to a log level string
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// One `--column` declaration: name, source header and parser name.
///
/// The header may itself contain `:`; the parser is whatever follows
/// the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub header: String,
    pub parser: String,
}

impl FromStr for ColumnSpec {
    type Err = String;

    fn from_str(spec: &str) -> std::result::Result<Self, Self::Err> {
        let (name, rest) = spec
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=HEADER:PARSER, got '{spec}'"))?;
        let (header, parser) = rest
            .rsplit_once(':')
            .ok_or_else(|| format!("missing parser in '{spec}'; expected NAME=HEADER:PARSER"))?;
        if name.trim().is_empty() {
            return Err(format!("missing column name in '{spec}'"));
        }
        Ok(Self {
            name: name.trim().to_string(),
            header: header.trim().to_string(),
            parser: parser.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_spec_parses() {
        let spec: ColumnSpec = "price=Price:decimal".parse().unwrap();
        assert_eq!(spec.name, "price");
        assert_eq!(spec.header, "Price");
        assert_eq!(spec.parser, "decimal");
    }

    #[test]
    fn test_column_spec_header_may_contain_colons() {
        let spec: ColumnSpec = "when=Updated: At:string".parse().unwrap();
        assert_eq!(spec.header, "Updated: At");
        assert_eq!(spec.parser, "string");
    }

    #[test]
    fn test_column_spec_rejects_malformed_input() {
        assert!("PriceOnly".parse::<ColumnSpec>().is_err());
        assert!("price=Price".parse::<ColumnSpec>().is_err());
        assert!("=Price:decimal".parse::<ColumnSpec>().is_err());
    }

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "csv_importer",
            "parse",
            "products.csv",
            "-c",
            "name=Name:string",
            "-c",
            "price=Price:decimal",
            "-d",
            ";",
            "-n",
            "10",
            "-vv",
        ])
        .unwrap();

        match args.command.unwrap() {
            Commands::Parse(parse) => {
                assert_eq!(parse.path, Some(PathBuf::from("products.csv")));
                assert_eq!(parse.columns.len(), 2);
                assert_eq!(parse.delimiter, Some(';'));
                assert_eq!(parse.limit, Some(10));
                assert_eq!(parse.get_log_level(), "debug");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_check_args_with_content() {
        let args = Args::try_parse_from([
            "csv_importer",
            "check",
            "--content",
            "Name,Price",
            "-c",
            "name=Name:string",
        ])
        .unwrap();

        match args.command.unwrap() {
            Commands::Check(check) => {
                assert_eq!(check.content.as_deref(), Some("Name,Price"));
                assert_eq!(check.get_log_level(), "warn");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_columns_are_required() {
        let result = Args::try_parse_from(["csv_importer", "parse", "products.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_path_and_content_conflict() {
        let result = Args::try_parse_from([
            "csv_importer",
            "parse",
            "products.csv",
            "--content",
            "Name",
            "-c",
            "name=Name:string",
        ]);
        assert!(result.is_err());
    }
}
