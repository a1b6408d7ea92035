//! Schema command implementation.

use crate::cli::SchemaArgs;
use crate::commands::extract::load_schema;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the schema command.
pub async fn execute_schema(args: SchemaArgs, formatter: &Formatter) -> Result<()> {
    let schema = load_schema(&args.file)?;

    println!("{}", formatter.format_schema(&schema)?);
    if formatter.format() == crate::config::OutputFormat::Table {
        println!(
            "{}",
            formatter.success(&format!("{} is valid ({} fields)", args.file.display(), schema.len()))
        );
    }
    Ok(())
}
