use clap::Parser;
use csv_importer::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    match commands::run(command) {
        Ok(()) => {
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("CSV Importer - Declarative CSV Parsing");
    println!("======================================");
    println!();
    println!("Parse CSV data with named, typed columns. Each column binds a name to a");
    println!("CSV header and one of the built-in parsers: boolean, integer, decimal,");
    println!("string or raw.");
    println!();
    println!("USAGE:");
    println!("    csv_importer <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    parse       Parse a CSV source and print every parsed row");
    println!("    check       Validate that a CSV source has the expected headers");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Parse a product catalog with typed columns:");
    println!("    csv_importer parse products.csv \\");
    println!("        --column name=Name:string --column price=Price:decimal \\");
    println!("        --column available=Available:boolean");
    println!();
    println!("    # Parse inline content instead of a file:");
    println!("    csv_importer parse --content $'Name,Price\\nWidget,$9.99' \\");
    println!("        --column name=Name:string --column price=Price:decimal");
    println!();
    println!("    # Check that a file's headers match the declared columns:");
    println!("    csv_importer check orders.csv --column 'id=Order ID:integer'");
    println!();
    println!("For detailed help on any command, use:");
    println!("    csv_importer <COMMAND> --help");
}
