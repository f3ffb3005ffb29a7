//! Declarative importer definitions and the import driver.
//!
//! A [`Definition`] is built once: named columns with parsing rules, an
//! optional row processor, and the names of any dependencies the
//! processing code expects. Definitions are immutable and cheap to
//! share, so one definition can drive any number of [`Importer`]
//! instances, each with its own source, reader options and dependency
//! values.

pub mod options;
pub mod run;

#[cfg(test)]
pub mod tests;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{BoxedError, Error, Result};
use crate::parsers::{BuiltinParser, CustomParser};
use crate::row::{DependencyMap, ParsedRow, RowContext};
use crate::schema::{Column, Rule, Schema};
use crate::source::Source;
use crate::value::Value;

pub use options::ReaderOptions;
pub use run::ImportSummary;

use run::ImportRun;

/// Signature of a row processor.
///
/// Called once per data row with the parsed row and its context. An
/// error fails the import at that row.
pub type RowProcessor =
    dyn Fn(&ParsedRow, &RowContext<'_>) -> std::result::Result<(), BoxedError> + Send + Sync;

/// An immutable importer definition: what the columns are, how each one
/// parses, what happens to every row, and which dependencies the row
/// code expects to be assigned before a run.
pub struct Definition {
    name: String,
    schema: Schema,
    processor: Option<Arc<RowProcessor>>,
    dependencies: Vec<String>,
}

impl Definition {
    /// Starts building a definition. Equivalent to [`Importer::define`].
    pub fn builder(name: impl Into<String>) -> DefinitionBuilder {
        DefinitionBuilder::new(name)
    }

    /// The importer's name, used in logs and error messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared columns
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Names of dependencies that must be assigned before importing
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// True when a row processor was registered
    pub fn has_processor(&self) -> bool {
        self.processor.is_some()
    }

    pub(crate) fn processor(&self) -> Option<&RowProcessor> {
        self.processor.as_deref()
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("columns", &self.schema.names().collect::<Vec<_>>())
            .field("dependencies", &self.dependencies)
            .field("has_processor", &self.has_processor())
            .finish()
    }
}

/// Builds a [`Definition`] column by column.
///
/// Column declarations are validated as they are added: unknown parser
/// names, duplicate column names, reserved names and blank headers are
/// all rejected immediately, naming the offending column.
pub struct DefinitionBuilder {
    name: String,
    schema: Schema,
    parsers: IndexMap<String, Arc<CustomParser>>,
    processor: Option<Arc<RowProcessor>>,
    dependencies: Vec<String>,
}

impl DefinitionBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: Schema::default(),
            parsers: IndexMap::new(),
            processor: None,
            dependencies: Vec::new(),
        }
    }

    /// Declares a column that reads `header` and parses with the named
    /// parser. The name resolves against parsers registered with
    /// [`DefinitionBuilder::parser`] first, then the built-in set, so a
    /// registered parser can shadow a built-in.
    pub fn column(mut self, name: &str, header: &str, parser: &str) -> Result<Self> {
        let rule = self.lookup_parser(name, parser)?;
        self.schema.add(Column::new(name, header, rule))?;
        Ok(self)
    }

    /// Declares a column parsed by its own closure
    pub fn column_with<F>(mut self, name: &str, header: &str, parse: F) -> Result<Self>
    where
        F: Fn(&str, &RowContext<'_>) -> std::result::Result<Value, BoxedError>
            + Send
            + Sync
            + 'static,
    {
        self.schema
            .add(Column::new(name, header, Rule::Custom(Arc::new(parse))))?;
        Ok(self)
    }

    /// Registers a named parser for later columns to use. Registering
    /// the same name again replaces the earlier parser, but columns
    /// already declared keep the rule they resolved to.
    pub fn parser<F>(mut self, name: &str, parse: F) -> Self
    where
        F: Fn(&str, &RowContext<'_>) -> std::result::Result<Value, BoxedError>
            + Send
            + Sync
            + 'static,
    {
        self.parsers.insert(name.to_string(), Arc::new(parse));
        self
    }

    /// Declares a dependency the row code expects. Declaring the same
    /// name twice is harmless.
    pub fn dependency(mut self, name: &str) -> Self {
        if !self.dependencies.iter().any(|declared| declared == name) {
            self.dependencies.push(name.to_string());
        }
        self
    }

    /// Registers the row processor. The last registration wins.
    pub fn for_each_row<F>(mut self, process: F) -> Self
    where
        F: Fn(&ParsedRow, &RowContext<'_>) -> std::result::Result<(), BoxedError>
            + Send
            + Sync
            + 'static,
    {
        self.processor = Some(Arc::new(process));
        self
    }

    /// Finishes the definition
    pub fn build(self) -> Definition {
        debug!(
            importer = %self.name,
            columns = self.schema.len(),
            dependencies = self.dependencies.len(),
            "definition built"
        );
        Definition {
            name: self.name,
            schema: self.schema,
            processor: self.processor,
            dependencies: self.dependencies,
        }
    }

    fn lookup_parser(&self, column: &str, parser: &str) -> Result<Rule> {
        if let Some(custom) = self.parsers.get(parser) {
            return Ok(Rule::Custom(Arc::clone(custom)));
        }
        if let Some(builtin) = BuiltinParser::lookup(parser) {
            return Ok(Rule::Builtin(builtin));
        }
        let mut available: Vec<String> =
            BuiltinParser::NAMES.iter().map(|name| name.to_string()).collect();
        available.extend(self.parsers.keys().cloned());
        Err(Error::unknown_parser(column, parser, available))
    }
}

impl fmt::Debug for DefinitionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionBuilder")
            .field("name", &self.name)
            .field("columns", &self.schema.names().collect::<Vec<_>>())
            .field("parsers", &self.parsers.keys().collect::<Vec<_>>())
            .field("dependencies", &self.dependencies)
            .field("has_processor", &self.processor.is_some())
            .finish()
    }
}

/// Imports CSV data according to a [`Definition`].
///
/// An importer owns the run state: the source, the reader options, and
/// the dependency values. The definition it was created from is shared
/// and never modified.
pub struct Importer {
    definition: Arc<Definition>,
    source: Option<Source>,
    options: ReaderOptions,
    dependencies: DependencyMap,
}

impl Importer {
    /// Starts building a new importer definition
    pub fn define(name: impl Into<String>) -> DefinitionBuilder {
        DefinitionBuilder::new(name)
    }

    /// Creates an importer for a definition. Accepts a [`Definition`]
    /// directly or an `Arc<Definition>` shared with other importers.
    pub fn new(definition: impl Into<Arc<Definition>>) -> Self {
        Self {
            definition: definition.into(),
            source: None,
            options: ReaderOptions::default(),
            dependencies: DependencyMap::new(),
        }
    }

    /// Assigns the CSV source, validating path sources eagerly
    pub fn with_source(mut self, source: impl Into<Source>) -> Result<Self> {
        self.set_source(source)?;
        Ok(self)
    }

    /// Assigns the CSV source in place, validating path sources eagerly
    pub fn set_source(&mut self, source: impl Into<Source>) -> Result<()> {
        let source = source.into();
        source.validate()?;
        self.source = Some(source);
        Ok(())
    }

    /// Replaces the reader options wholesale
    pub fn with_reader_options(mut self, options: ReaderOptions) -> Self {
        self.options = options;
        self
    }

    /// The reader options for the next run
    pub fn reader_options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Mutable access to the reader options
    pub fn reader_options_mut(&mut self) -> &mut ReaderOptions {
        &mut self.options
    }

    /// Assigns a value for a declared dependency
    pub fn with_dependency<T: Any + Send + Sync>(mut self, name: &str, value: T) -> Result<Self> {
        self.set_dependency(name, value)?;
        Ok(self)
    }

    /// Assigns a value for a declared dependency in place
    pub fn set_dependency<T: Any + Send + Sync>(&mut self, name: &str, value: T) -> Result<()> {
        if !self
            .definition
            .dependencies()
            .iter()
            .any(|declared| declared == name)
        {
            return Err(Error::unknown_dependency(
                self.definition.name(),
                name,
                self.definition.dependencies().to_vec(),
            ));
        }
        self.dependencies.insert(name.to_string(), Arc::new(value));
        Ok(())
    }

    /// Sets a named option from string form.
    ///
    /// `path` and `content` assign the source, the rest configure the
    /// reader. Unknown names are rejected with the full list of what
    /// would have been accepted.
    pub fn set_option(&mut self, option: &str, value: &str) -> Result<()> {
        match option {
            "path" => self.set_source(Source::path(value)),
            "content" => {
                self.source = Some(Source::content(value));
                Ok(())
            }
            "delimiter" => {
                self.options.delimiter = options::parse_char_option(option, value)?;
                Ok(())
            }
            "quote" => {
                self.options.quote = options::parse_char_option(option, value)?;
                Ok(())
            }
            "flexible" => {
                self.options.flexible = options::parse_bool_option(option, value)?;
                Ok(())
            }
            "comment" => {
                self.options.comment = if value.is_empty() {
                    None
                } else {
                    Some(options::parse_char_option(option, value)?)
                };
                Ok(())
            }
            _ => Err(Error::unrecognized_option(
                option,
                self.definition.dependencies().to_vec(),
            )),
        }
    }

    /// The definition this importer runs
    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Runs the import: reads the source, parses every row, and hands
    /// each parsed row to the row processor.
    ///
    /// Checks run in a fixed order before the first row is read: the
    /// definition must have a row processor, every declared dependency
    /// must be assigned, the source must be present and open, and the
    /// header row must cover every declared column.
    pub fn import(&mut self) -> Result<ImportSummary> {
        let definition = Arc::clone(&self.definition);
        let process = definition
            .processor()
            .ok_or_else(|| Error::undefined_row_processor(definition.name()))?;

        let mut run = ImportRun::start(
            &definition,
            &self.dependencies,
            &mut self.source,
            &self.options,
        )?;
        while let Some(row) = run.next_row()? {
            let context = run.context();
            process(&row, &context)
                .map_err(|source| Error::row_processor(context.row_number(), source))?;
        }

        let summary = run.finish();
        info!(
            importer = definition.name(),
            rows = summary.rows,
            "import finished"
        );
        Ok(summary)
    }

    /// Parses the whole source and returns the rows instead of running
    /// a processor. The definition does not need a row processor.
    pub fn parsed_values(&mut self) -> Result<Vec<ParsedRow>> {
        let definition = Arc::clone(&self.definition);
        let mut run = ImportRun::start(
            &definition,
            &self.dependencies,
            &mut self.source,
            &self.options,
        )?;
        let mut rows = Vec::new();
        while let Some(row) = run.next_row()? {
            rows.push(row);
        }
        debug!(
            importer = definition.name(),
            rows = rows.len(),
            "collected parsed rows"
        );
        Ok(rows)
    }

    /// Opens the source and validates the header row without reading
    /// any data rows. Returns the headers the file actually has.
    pub fn check_headers(&mut self) -> Result<Vec<String>> {
        let definition = Arc::clone(&self.definition);
        let run = ImportRun::start(
            &definition,
            &self.dependencies,
            &mut self.source,
            &self.options,
        )?;
        Ok(run.header_names())
    }
}

impl fmt::Debug for Importer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Importer")
            .field("definition", &self.definition)
            .field("source", &self.source)
            .field("options", &self.options)
            .field(
                "dependencies",
                &self.dependencies.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}
