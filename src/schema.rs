//! Column declarations and the schema an importer is defined by.
//!
//! A schema is an ordered set of named columns. Each column knows the
//! CSV header it reads from and the rule that turns the raw field into
//! a [`Value`](crate::value::Value). Schemas are built once, validated
//! as they are built, and never change afterwards.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::parsers::{BuiltinParser, CustomParser};
use crate::row::Headers;

/// Column names the importer keeps for its own row accessors
pub const RESERVED_COLUMN_NAMES: [&str; 3] = ["raw", "unparsed", "values"];

/// How a column turns its raw field into a value
#[derive(Clone)]
pub(crate) enum Rule {
    Builtin(BuiltinParser),
    Custom(Arc<CustomParser>),
}

impl Rule {
    /// Short label for listings and logs
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Rule::Builtin(parser) => parser.name(),
            Rule::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Builtin(parser) => f.debug_tuple("Builtin").field(&parser.name()).finish(),
            Rule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One declared column: a name, the header it reads from, and its rule
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    header: String,
    rule: Rule,
}

impl Column {
    pub(crate) fn new(name: impl Into<String>, header: impl Into<String>, rule: Rule) -> Self {
        Self {
            name: name.into(),
            header: header.into(),
            rule,
        }
    }

    /// The name the parsed value is looked up under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The CSV header this column reads from
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The name of the column's parser, or `custom` for closures
    pub fn parser_name(&self) -> &'static str {
        self.rule.describe()
    }

    pub(crate) fn rule(&self) -> &Rule {
        &self.rule
    }
}

/// The ordered, validated set of columns an importer is defined with
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: IndexMap<String, Column>,
}

impl Schema {
    /// Adds a column, rejecting duplicate names, reserved names, and
    /// blank source headers.
    pub(crate) fn add(&mut self, column: Column) -> Result<()> {
        if RESERVED_COLUMN_NAMES.contains(&column.name()) {
            return Err(Error::reserved_column_name(column.name()));
        }
        if self.columns.contains_key(column.name()) {
            return Err(Error::duplicate_column(column.name()));
        }
        if column.header().trim().is_empty() {
            return Err(Error::missing_header(column.name()));
        }
        self.columns.insert(column.name().to_string(), column);
        Ok(())
    }

    /// Number of declared columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Looks a column up by name
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Columns in declaration order
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Declared column names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Checks that every header the columns read from is present,
    /// reporting all missing headers at once.
    pub(crate) fn validate_headers(&self, headers: &Headers) -> Result<()> {
        let mut missing: Vec<String> = Vec::new();
        for column in self.columns.values() {
            if !headers.contains(column.header()) && !missing.iter().any(|h| h == column.header()) {
                missing.push(column.header().to_string());
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::missing_column(missing, headers.names().to_vec()))
        }
    }
}
