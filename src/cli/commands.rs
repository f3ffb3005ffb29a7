//! Command implementations for the CSV importer CLI
//!
//! This module builds an importer from the column declarations given on
//! the command line and runs a full parse or a header check against the
//! requested source. Library errors are wrapped with `anyhow` context
//! so failures print with the offending input attached.

use crate::cli::args::{CheckArgs, ColumnSpec, Commands, ParseArgs};
use crate::{Importer, Source};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tracing::{debug, info};

/// Main command runner for the CSV importer
///
/// Dispatches to the appropriate subcommand handler:
/// - `parse`: parse every row of the source and print the typed values
/// - `check`: validate headers against the declared columns
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Parse(args) => parse(args),
        Commands::Check(args) => check(args),
    }
}

/// Parse command runner
///
/// Builds an importer from the declared columns, parses every row of
/// the source, and prints the parsed values row by row. With `--limit`
/// only the first rows are printed, but every row is still parsed and
/// counted.
fn parse(args: ParseArgs) -> Result<()> {
    setup_logging(args.get_log_level());

    info!("Starting CSV parse");
    debug!("Command line arguments: {:?}", args);

    let mut importer = build_importer(&args.columns)?;
    apply_input(&mut importer, args.path, args.content)?;
    apply_delimiter(&mut importer, args.delimiter)?;

    let rows = importer
        .parsed_values()
        .context("Failed to parse CSV input")?;

    let shown = args.limit.unwrap_or(rows.len()).min(rows.len());
    for (index, row) in rows.iter().take(shown).enumerate() {
        println!("row {}:", index + 1);
        for (name, value) in row.values() {
            if value.is_null() {
                println!("  {name} = null");
            } else {
                println!("  {name} = {value}");
            }
        }
    }
    if rows.len() > shown {
        println!("... {} more row(s)", rows.len() - shown);
    }
    println!("{} row(s) parsed", rows.len());

    Ok(())
}

/// Check command runner
///
/// Verifies the source's headers cover every declared column. No rows
/// are read, so a check succeeds even when the data itself would fail
/// to parse.
fn check(args: CheckArgs) -> Result<()> {
    setup_logging(args.get_log_level());

    info!("Starting CSV header check");
    debug!("Command line arguments: {:?}", args);

    let mut importer = build_importer(&args.columns)?;
    apply_input(&mut importer, args.path, args.content)?;
    apply_delimiter(&mut importer, args.delimiter)?;

    let headers = importer.check_headers().context("Header check failed")?;

    println!("headers: {}", headers.join(", "));
    for column in importer.definition().schema().columns() {
        println!(
            "  {} <- '{}' ({})",
            column.name(),
            column.header(),
            column.parser_name()
        );
    }
    println!(
        "all {} column(s) matched",
        importer.definition().schema().len()
    );

    Ok(())
}

/// Build an importer from the command-line column declarations
fn build_importer(columns: &[ColumnSpec]) -> Result<Importer> {
    let mut builder = Importer::define("csv_importer");
    for spec in columns {
        builder = builder
            .column(&spec.name, &spec.header, &spec.parser)
            .with_context(|| format!("Invalid column declaration '{}'", spec.name))?;
    }
    Ok(Importer::new(builder.build()))
}

/// Point the importer at the requested input
///
/// The positional path and `--content` conflict at the clap level, so
/// at most one is set here.
fn apply_input(
    importer: &mut Importer,
    path: Option<PathBuf>,
    content: Option<String>,
) -> Result<()> {
    match (path, content) {
        (Some(path), _) => importer
            .set_source(Source::path(&path))
            .with_context(|| format!("Cannot read CSV file {}", path.display()))?,
        (None, Some(content)) => importer.set_source(Source::content(content))?,
        (None, None) => bail!("No CSV input given; pass FILE or --content CSV"),
    }
    Ok(())
}

fn apply_delimiter(importer: &mut Importer, delimiter: Option<char>) -> Result<()> {
    if let Some(delimiter) = delimiter {
        importer
            .set_option("delimiter", &delimiter.to_string())
            .context("Invalid delimiter")?;
    }
    Ok(())
}

/// Set up logging based on the verbosity flags
///
/// `RUST_LOG` takes precedence over the verbosity flags when set.
pub fn setup_logging(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("csv_importer={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
