//! Row-level data handed to user code during an import run.
//!
//! [`RawRow`] is the record as it came off the wire, addressable by
//! header. [`ParsedRow`] is the same record after every declared column
//! ran its rule. [`RowContext`] carries the per-run state a custom
//! parser or row processor can reach for: the importer name, the row
//! number, and any assigned dependencies.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bigdecimal::BigDecimal;
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::schema::{Rule, Schema};
use crate::value::Value;

/// Shared storage for dependency values, type-erased until lookup
pub(crate) type DependencyMap = HashMap<String, Arc<dyn Any + Send + Sync>>;

/// The header row of a CSV file, with positional lookup by name.
///
/// Header names are trimmed. When a file repeats a header, the first
/// occurrence wins, matching how fields are looked up by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Headers {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Headers {
    pub(crate) fn from_record(record: &csv::StringRecord) -> Self {
        Self::from_names(record.iter())
    }

    /// Builds headers from an ordered list of names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trimmed = Vec::new();
        let mut index = HashMap::new();
        for (position, name) in names.into_iter().enumerate() {
            let name = name.as_ref().trim().to_string();
            index.entry(name.clone()).or_insert(position);
            trimmed.push(name);
        }
        Self {
            names: trimmed,
            index,
        }
    }

    /// Header names in file order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True when a header with this name is present
    pub fn contains(&self, header: &str) -> bool {
        self.index.contains_key(header)
    }

    /// Position of a header, first occurrence winning
    pub fn position(&self, header: &str) -> Option<usize> {
        self.index.get(header).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One CSV record before any parsing, addressable by header name
#[derive(Debug, Clone)]
pub struct RawRow {
    headers: Arc<Headers>,
    record: csv::StringRecord,
}

impl RawRow {
    pub(crate) fn new(headers: Arc<Headers>, record: csv::StringRecord) -> Self {
        Self { headers, record }
    }

    /// The raw field under a header, `None` when the header is unknown
    /// or the record is too short to reach it
    pub fn get(&self, header: &str) -> Option<&str> {
        self.headers
            .position(header)
            .and_then(|position| self.record.get(position))
    }

    /// The headers this row was read under
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Raw fields in file order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.record.iter()
    }

    /// Number of fields actually present in the record
    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }
}

/// Per-row state available to custom parsers and row processors
pub struct RowContext<'a> {
    importer: &'a str,
    dependencies: &'a DependencyMap,
    row_number: usize,
}

impl<'a> RowContext<'a> {
    pub(crate) fn new(
        importer: &'a str,
        dependencies: &'a DependencyMap,
        row_number: usize,
    ) -> Self {
        Self {
            importer,
            dependencies,
            row_number,
        }
    }

    /// Name of the importer running this row
    pub fn importer(&self) -> &str {
        self.importer
    }

    /// 1-based position of this row among the data rows
    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// Fetches an assigned dependency as the type it was assigned with
    pub fn dependency<T: Any + Send + Sync>(&self, name: &str) -> Result<&T> {
        let value = self
            .dependencies
            .get(name)
            .ok_or_else(|| Error::missing_dependency(self.importer, name))?;
        value
            .downcast_ref::<T>()
            .ok_or_else(|| Error::dependency_type(self.importer, name, type_name::<T>()))
    }
}

impl fmt::Debug for RowContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowContext")
            .field("importer", &self.importer)
            .field("row_number", &self.row_number)
            .field(
                "dependencies",
                &self.dependencies.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// One CSV record after every declared column ran its parsing rule.
///
/// Values keep declaration order, and the raw record stays reachable
/// through [`ParsedRow::raw`].
#[derive(Debug, Clone)]
pub struct ParsedRow {
    values: IndexMap<String, Value>,
    raw: RawRow,
}

impl ParsedRow {
    /// Runs every column rule over the raw record. Absent fields parse
    /// as the empty string, so ragged rows flow through the same rules
    /// as complete ones.
    pub(crate) fn from_raw(schema: &Schema, raw: RawRow, context: &RowContext<'_>) -> Result<Self> {
        let mut values = IndexMap::with_capacity(schema.len());
        for column in schema.columns() {
            let field = raw.get(column.header()).unwrap_or("");
            let value = match column.rule() {
                Rule::Builtin(parser) => parser.parse(field).ok_or_else(|| {
                    Error::invalid_decimal(column.name(), context.row_number(), field)
                })?,
                Rule::Custom(parse) => parse(field, context).map_err(|source| {
                    Error::custom_parse(column.name(), context.row_number(), source)
                })?,
            };
            values.insert(column.name().to_string(), value);
        }
        Ok(Self { values, raw })
    }

    /// The parsed value of a column, `None` when no such column exists
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The parsed value of a column, failing with the list of defined
    /// columns when the name was never declared
    pub fn value(&self, name: &str) -> Result<&Value> {
        self.values.get(name).ok_or_else(|| {
            Error::unknown_column(name, self.values.keys().cloned().collect())
        })
    }

    /// Boolean value of a column, `None` on missing or non-boolean
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Integer value of a column, `None` on missing or non-integer
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_integer)
    }

    /// Decimal value of a column, `None` on missing or non-decimal
    pub fn decimal(&self, name: &str) -> Option<&BigDecimal> {
        self.get(name).and_then(Value::as_decimal)
    }

    /// String value of a column, `None` on missing or non-string
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Parsed values in declaration order
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The record as it came off the wire
    pub fn raw(&self) -> &RawRow {
        &self.raw
    }

    /// Number of declared columns on this row
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::BuiltinParser;
    use crate::schema::Column;
    use std::str::FromStr;

    fn headers(names: &[&str]) -> Arc<Headers> {
        Arc::new(Headers::from_names(names.iter().copied()))
    }

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_headers_are_trimmed() {
        let headers = Headers::from_names([" Name ", "Price"]);
        assert_eq!(headers.names(), ["Name", "Price"]);
        assert_eq!(headers.position("Name"), Some(0));
        assert!(headers.contains("Price"));
        assert!(!headers.contains("price"));
    }

    #[test]
    fn test_duplicate_headers_first_occurrence_wins() {
        let headers = Headers::from_names(["Name", "Price", "Name"]);
        assert_eq!(headers.len(), 3);
        assert_eq!(headers.position("Name"), Some(0));
    }

    #[test]
    fn test_raw_row_lookup() {
        let row = RawRow::new(headers(&["Name", "Price"]), record(&["Widget", "$9.99"]));
        assert_eq!(row.get("Name"), Some("Widget"));
        assert_eq!(row.get("Price"), Some("$9.99"));
        assert_eq!(row.get("Quantity"), None);
    }

    #[test]
    fn test_raw_row_short_record() {
        let row = RawRow::new(headers(&["Name", "Price"]), record(&["Widget"]));
        assert_eq!(row.get("Name"), Some("Widget"));
        assert_eq!(row.get("Price"), None);
        assert_eq!(row.len(), 1);
    }

    #[test]
    fn test_context_dependency_lookup() {
        let mut dependencies = DependencyMap::new();
        dependencies.insert("tax_rate".to_string(), Arc::new(0.2_f64));
        let context = RowContext::new("products", &dependencies, 3);

        assert_eq!(context.row_number(), 3);
        assert_eq!(context.importer(), "products");
        assert_eq!(*context.dependency::<f64>("tax_rate").unwrap(), 0.2);
    }

    #[test]
    fn test_context_missing_dependency() {
        let dependencies = DependencyMap::new();
        let context = RowContext::new("products", &dependencies, 1);
        let error = context.dependency::<f64>("tax_rate").unwrap_err();
        assert!(matches!(error, Error::MissingDependency { .. }));
    }

    #[test]
    fn test_context_dependency_type_mismatch() {
        let mut dependencies = DependencyMap::new();
        dependencies.insert("tax_rate".to_string(), Arc::new(0.2_f64));
        let context = RowContext::new("products", &dependencies, 1);
        let error = context.dependency::<String>("tax_rate").unwrap_err();
        assert!(matches!(error, Error::DependencyType { .. }));
    }

    fn product_schema() -> Schema {
        let mut schema = Schema::default();
        schema
            .add(Column::new("name", "Name", Rule::Builtin(BuiltinParser::String)))
            .unwrap();
        schema
            .add(Column::new(
                "price",
                "Price",
                Rule::Builtin(BuiltinParser::Decimal),
            ))
            .unwrap();
        schema
            .add(Column::new(
                "available",
                "Available",
                Rule::Builtin(BuiltinParser::Boolean),
            ))
            .unwrap();
        schema
    }

    #[test]
    fn test_from_raw_parses_each_column() {
        let schema = product_schema();
        let raw = RawRow::new(
            headers(&["Name", "Price", "Available"]),
            record(&["  Widget ", "$9.99", "t"]),
        );
        let dependencies = DependencyMap::new();
        let context = RowContext::new("products", &dependencies, 1);

        let row = ParsedRow::from_raw(&schema, raw, &context).unwrap();
        assert_eq!(row.string("name"), Some("Widget"));
        assert_eq!(row.decimal("price"), BigDecimal::from_str("9.99").ok().as_ref());
        assert_eq!(row.boolean("available"), Some(true));
        assert_eq!(row.raw().get("Price"), Some("$9.99"));
    }

    #[test]
    fn test_from_raw_reports_decimal_failures_with_position() {
        let schema = product_schema();
        let raw = RawRow::new(
            headers(&["Name", "Price", "Available"]),
            record(&["Widget", "n/a", "t"]),
        );
        let dependencies = DependencyMap::new();
        let context = RowContext::new("products", &dependencies, 7);

        let error = ParsedRow::from_raw(&schema, raw, &context).unwrap_err();
        match error {
            Error::InvalidDecimal { column, row, value } => {
                assert_eq!(column, "price");
                assert_eq!(row, 7);
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_raw_custom_parser_sees_context() {
        let mut schema = Schema::default();
        schema
            .add(Column::new(
                "tagged",
                "Name",
                Rule::Custom(Arc::new(|field, context| {
                    Ok(Value::String(format!("{}:{}", context.row_number(), field)))
                })),
            ))
            .unwrap();
        let raw = RawRow::new(headers(&["Name"]), record(&["Widget"]));
        let dependencies = DependencyMap::new();
        let context = RowContext::new("products", &dependencies, 4);

        let row = ParsedRow::from_raw(&schema, raw, &context).unwrap();
        assert_eq!(row.string("tagged"), Some("4:Widget"));
    }

    #[test]
    fn test_from_raw_wraps_custom_parser_errors() {
        let mut schema = Schema::default();
        schema
            .add(Column::new(
                "strict",
                "Name",
                Rule::Custom(Arc::new(|_, _| Err("nope".into()))),
            ))
            .unwrap();
        let raw = RawRow::new(headers(&["Name"]), record(&["Widget"]));
        let dependencies = DependencyMap::new();
        let context = RowContext::new("products", &dependencies, 2);

        let error = ParsedRow::from_raw(&schema, raw, &context).unwrap_err();
        match error {
            Error::CustomParse { column, row, .. } => {
                assert_eq!(column, "strict");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_raw_feeds_missing_fields_as_empty() {
        let schema = product_schema();
        let raw = RawRow::new(headers(&["Name", "Price", "Available"]), record(&["Widget", "1.00"]));
        let dependencies = DependencyMap::new();
        let context = RowContext::new("products", &dependencies, 1);

        let row = ParsedRow::from_raw(&schema, raw, &context).unwrap();
        assert_eq!(row.boolean("available"), Some(false));
    }

    #[test]
    fn test_value_lookup_rejects_unknown_columns() {
        let schema = product_schema();
        let raw = RawRow::new(
            headers(&["Name", "Price", "Available"]),
            record(&["Widget", "1.00", "t"]),
        );
        let dependencies = DependencyMap::new();
        let context = RowContext::new("products", &dependencies, 1);
        let row = ParsedRow::from_raw(&schema, raw, &context).unwrap();

        assert!(row.value("price").is_ok());
        let error = row.value("cost").unwrap_err();
        match error {
            Error::UnknownColumn { name, declared } => {
                assert_eq!(name, "cost");
                assert_eq!(declared, ["name", "price", "available"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_values_iterate_in_declaration_order() {
        let schema = product_schema();
        let raw = RawRow::new(
            headers(&["Name", "Price", "Available"]),
            record(&["Widget", "1.00", "t"]),
        );
        let dependencies = DependencyMap::new();
        let context = RowContext::new("products", &dependencies, 1);
        let row = ParsedRow::from_raw(&schema, raw, &context).unwrap();

        let names: Vec<&str> = row.values().map(|(name, _)| name).collect();
        assert_eq!(names, ["name", "price", "available"]);
    }
}
