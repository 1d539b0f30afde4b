//! Rowbind CLI - bind CSV rows to typed JSON records
//!
//! # Commands
//!
//! ```bash
//! rowbind bind input.csv --fields fields.json          # Bind rows, output JSON payloads
//! rowbind parse input.csv                              # Just parse CSV to JSON arrays
//! rowbind validate records.json --json-schema s.json   # Validate JSON records
//! rowbind kinds                                        # Show field kinds and literals
//! ```

use clap::{Parser, Subcommand};
use rowbind::batch::{format_delimiter, parse_delimiter, process_bytes, BatchOptions, EmptyHeaderPolicy};
use rowbind::binding::{FieldKind, RecordSchema, FALSE_LITERALS, TRUE_LITERALS};
use rowbind::logs::LOG_BROADCASTER;
use rowbind::parser::parse_bytes_auto;
use rowbind::validation::{NoValidation, SchemaValidator};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rowbind")]
#[command(about = "Bind CSV rows to typed records", long_about = None)]
struct Cli {
    /// Don't echo pipeline logs to stderr
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV file and output JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long, value_parser = delimiter_arg)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Bind every row to a record described by a field schema
    Bind {
        /// Input CSV file
        input: PathBuf,

        /// Field schema JSON: {"fields": [{"name", "column", "kind"}]}
        #[arg(short, long)]
        fields: PathBuf,

        /// Validate payloads against a JSON Schema (draft 7)
        #[arg(long)]
        json_schema: Option<PathBuf>,

        /// Output file for payloads (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write row errors to this file as JSON
        #[arg(long)]
        errors: Option<PathBuf>,

        /// Batch options JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Fail the batch when the header row is missing or empty
        #[arg(long)]
        abort_on_empty_header: bool,

        /// Skip validation
        #[arg(long)]
        no_validate: bool,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long, value_parser = delimiter_arg)]
        delimiter: Option<char>,
    },

    /// Validate JSON records against a JSON Schema
    Validate {
        /// Input JSON file (array of records)
        input: PathBuf,

        /// JSON Schema file
        #[arg(long)]
        json_schema: PathBuf,
    },

    /// Show supported field kinds and boolean literals
    Kinds,
}

struct BindArgs {
    input: PathBuf,
    fields: PathBuf,
    json_schema: Option<PathBuf>,
    output: Option<PathBuf>,
    errors: Option<PathBuf>,
    config: Option<PathBuf>,
    abort_on_empty_header: bool,
    no_validate: bool,
    delimiter: Option<char>,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if cli.quiet {
        LOG_BROADCASTER.set_echo(false);
    }

    let result = match cli.command {
        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter, output.as_deref()).await,

        Commands::Bind {
            input,
            fields,
            json_schema,
            output,
            errors,
            config,
            abort_on_empty_header,
            no_validate,
            delimiter,
        } => {
            cmd_bind(BindArgs {
                input,
                fields,
                json_schema,
                output,
                errors,
                config,
                abort_on_empty_header,
                no_validate,
                delimiter,
            })
            .await
        }

        Commands::Validate { input, json_schema } => cmd_validate(&input, &json_schema).await,

        Commands::Kinds => cmd_kinds(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn delimiter_arg(value: &str) -> Result<char, String> {
    parse_delimiter(value).map_err(|e| e.to_string())
}

async fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let bytes = tokio::fs::read(input).await?;
    let result = parse_bytes_auto(&bytes, delimiter)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", result.headers().join(", "));
    eprintln!("✅ Parsed {} rows", result.row_count());

    let json = serde_json::to_string_pretty(&result.records)?;
    write_output(&json, output).await?;

    Ok(())
}

/// Defaults, then config file, then environment, then flags.
fn load_options(args: &BindArgs) -> Result<BatchOptions, Box<dyn std::error::Error>> {
    let base = match &args.config {
        Some(path) => BatchOptions::from_json_file(path)?,
        None => BatchOptions::default(),
    };
    let mut options = base.with_env()?;

    if args.abort_on_empty_header {
        options.empty_header = EmptyHeaderPolicy::Abort;
    }
    if args.no_validate {
        options.skip_validation = true;
    }
    if args.delimiter.is_some() {
        options.delimiter = args.delimiter;
    }
    Ok(options)
}

async fn cmd_bind(args: BindArgs) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", args.input.display());

    let options = load_options(&args)?;

    let schema = RecordSchema::from_file(&args.fields)?;
    eprintln!("   Fields: {}", schema.fields.len());

    let bytes = tokio::fs::read(&args.input).await?;
    let run = match &args.json_schema {
        Some(path) if !options.skip_validation => {
            let validator = SchemaValidator::from_json(&tokio::fs::read_to_string(path).await?)?;
            process_bytes(&bytes, &schema, &validator, &options)?
        }
        _ => process_bytes(&bytes, &schema, NoValidation, &options)?,
    };

    eprintln!("   Encoding: {}", run.csv_info.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(run.csv_info.delimiter));
    eprintln!("   Rows: {}", run.csv_info.row_count);
    eprintln!("   Columns: {}", run.csv_info.headers.join(", "));

    eprintln!("\n⚙️  {}", run.batch.summary());

    if let Some(errors_path) = &args.errors {
        let errors_json = serde_json::to_string_pretty(&run.batch.errors)?;
        tokio::fs::write(errors_path, &errors_json).await?;
        eprintln!("   💾 Row errors saved to: {}", errors_path.display());
    }

    let payloads_json = serde_json::to_string_pretty(&run.batch.payloads)?;
    write_output(&payloads_json, args.output.as_deref()).await?;

    eprintln!("\n✨ Done!");
    Ok(())
}

async fn cmd_validate(input: &Path, schema_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("✔️  Validating: {}", input.display());

    let validator = SchemaValidator::from_json(&tokio::fs::read_to_string(schema_path).await?)?;
    let content = tokio::fs::read_to_string(input).await?;
    let records: Vec<Value> = serde_json::from_str(&content)?;

    let mut valid = 0;
    let mut invalid = 0;

    for (i, record) in records.iter().enumerate() {
        match validator.validate_value(record) {
            Ok(()) => valid += 1,
            Err(error) => {
                invalid += 1;
                if invalid <= 5 {
                    eprintln!("\n❌ Record {} invalid:", i);
                    eprintln!("   - {}", error);
                }
            }
        }
    }

    eprintln!("\n📊 Results: {} valid, {} invalid", valid, invalid);

    if invalid > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_kinds() -> Result<(), Box<dyn std::error::Error>> {
    println!("Field kinds:");
    for kind in FieldKind::ALL {
        println!("  {}", kind);
    }
    println!("\nBoolean literals:");
    println!("  true:  {}", TRUE_LITERALS.join(", "));
    println!("  false: {}", FALSE_LITERALS.join(", "));
    Ok(())
}

async fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            tokio::fs::write(p, content).await?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
