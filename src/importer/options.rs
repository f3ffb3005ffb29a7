//! Reader configuration for an import run.
//!
//! Defaults are deliberately permissive: comma-delimited, double-quote
//! quoting, and flexible record lengths so ragged rows parse instead of
//! aborting the run. Short rows surface as empty fields, long rows keep
//! their extra fields reachable through the raw row.

use std::io::Read;

use crate::error::{Error, Result};

/// How the CSV reader tokenizes the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Field delimiter, a comma unless told otherwise
    pub delimiter: u8,
    /// Quoting character for embedded delimiters and line breaks
    pub quote: u8,
    /// Accept records whose field count differs from the header row
    pub flexible: bool,
    /// Skip lines starting with this byte when set
    pub comment: Option<u8>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            flexible: true,
            comment: None,
        }
    }
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quoting character
    pub fn quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Controls whether ragged records are accepted
    pub fn flexible(mut self, flexible: bool) -> Self {
        self.flexible = flexible;
        self
    }

    /// Sets or clears the comment character
    pub fn comment(mut self, comment: Option<u8>) -> Self {
        self.comment = comment;
        self
    }

    /// Builds a csv reader over `input` with these options. The header
    /// row is always consumed as headers.
    pub(crate) fn reader<R: Read>(&self, input: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .quote(self.quote)
            .flexible(self.flexible)
            .comment(self.comment)
            .has_headers(true)
            .from_reader(input)
    }
}

/// Parses a one-character option value into its byte
pub(crate) fn parse_char_option(option: &str, value: &str) -> Result<u8> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(Error::invalid_option_value(
            option,
            value,
            "a single ASCII character",
        )),
    }
}

/// Parses a boolean option value
pub(crate) fn parse_bool_option(option: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::invalid_option_value(option, value, "'true' or 'false'")),
    }
}
