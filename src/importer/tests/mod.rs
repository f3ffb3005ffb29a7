//! Test fixtures shared across the importer test modules.
//!
//! The product catalog sample exercises every built-in parser plus the
//! quoting and currency cases that show up in real exports.

use std::io::Write;
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use crate::importer::{Definition, Importer};
use crate::row::ParsedRow;


/// Three products covering quoted fields, currency noise, an empty
/// field and a unit-suffixed quantity
pub fn products_csv() -> String {
    concat!(
        "Name,Price,Available,Quantity,Description\n",
        "Widget,$9.99,true,3,\"A fine, useful widget\"\n",
        "Gadget,$12.50,f,0,\n",
        "Doohickey,\"$1,234.56\",1,12 units,Needs assembly\n",
    )
    .to_string()
}

/// A definition over [`products_csv`] with one column per built-in
/// parser and no row processor
pub fn product_definition() -> Definition {
    Importer::define("products")
        .column("name", "Name", "string")
        .unwrap()
        .column("price", "Price", "decimal")
        .unwrap()
        .column("available", "Available", "boolean")
        .unwrap()
        .column("quantity", "Quantity", "integer")
        .unwrap()
        .column("description", "Description", "raw")
        .unwrap()
        .build()
}

/// Same columns as [`product_definition`] plus a processor that clones
/// every dispatched row into the returned collector
pub fn collecting_definition() -> (Definition, Arc<Mutex<Vec<ParsedRow>>>) {
    let collected: Arc<Mutex<Vec<ParsedRow>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&collected);
    let definition = Importer::define("products")
        .column("name", "Name", "string")
        .unwrap()
        .column("price", "Price", "decimal")
        .unwrap()
        .column("available", "Available", "boolean")
        .unwrap()
        .column("quantity", "Quantity", "integer")
        .unwrap()
        .column("description", "Description", "raw")
        .unwrap()
        .for_each_row(move |row, _| {
            sink.lock().unwrap().push(row.clone());
            Ok(())
        })
        .build();
    (definition, collected)
}

/// Writes `content` to a temp file and returns the handle
pub fn create_temp_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}
