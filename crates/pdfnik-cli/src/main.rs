//! Command line front end for validating and normalizing PDF order payloads.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pdfnik_core::contract::schema;
use pdfnik_core::{Order, ParseOptions, ValidationError};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pdfnik", version, about = "Validate and normalize PDF order payloads")]
struct Cli {
    /// Log parser decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a payload and report the first problem found
    Validate {
        /// Payload file (.json, .yaml, .yml) or "-" for stdin
        input: String,

        /// Treat the payload as a document reference instead of an order
        #[arg(long)]
        document: bool,

        /// Reject entities that run past the end of their text
        #[arg(long)]
        strict_entities: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Parse a payload and print it back as canonical JSON
    Normalize {
        input: String,

        #[arg(long)]
        document: bool,

        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },

    /// List storage keys of every image in an order
    Images { input: String },

    /// Print the JSON Schema of the order contract
    Schema,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Validate {
            input,
            document,
            strict_entities,
            format,
        } => {
            let raw = read_payload(&input)?;
            let options = ParseOptions {
                strict_entity_bounds: strict_entities,
            };
            let outcome = if document {
                pdfnik_core::parse_document_reference(&raw).map(|_| ())
            } else {
                pdfnik_core::parse_with(&raw, &options).map(|_| ())
            };
            let valid = report(&input, outcome, format)?;
            Ok(if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Normalize {
            input,
            document,
            compact,
        } => {
            let raw = read_payload(&input)?;
            let value = if document {
                parse_or_bail(pdfnik_core::parse_document_reference(&raw), &input)?.to_value()?
            } else {
                parse_or_bail(pdfnik_core::parse(&raw), &input)?.to_value()?
            };
            let text = if compact {
                serde_json::to_string(&value)?
            } else {
                serde_json::to_string_pretty(&value)?
            };
            println!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Command::Images { input } => {
            let raw = read_payload(&input)?;
            let order: Order = parse_or_bail(pdfnik_core::parse(&raw), &input)?;
            for key in order.storage_keys() {
                println!("{}", key);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Schema => {
            println!("{}", schema::order_schema());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse_or_bail<T>(result: Result<T, ValidationError>, input: &str) -> Result<T> {
    result.with_context(|| format!("{} is not a valid payload", input))
}

/// Print the validation outcome; returns whether the payload was valid.
fn report(input: &str, outcome: Result<(), ValidationError>, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Text => match &outcome {
            Ok(()) => println!("{}: valid", input),
            Err(e) => println!("{}: {}", input, e),
        },
        OutputFormat::Json => {
            let body = match &outcome {
                Ok(()) => json!({ "input": input, "valid": true }),
                Err(e) => json!({
                    "input": input,
                    "valid": false,
                    "error": {
                        "kind": e.kind(),
                        "field": e.field(),
                        "message": e.to_string(),
                    }
                }),
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(outcome.is_ok())
}

/// Read a payload as an untyped value, choosing the decoder by extension.
fn read_payload(input: &str) -> Result<Value> {
    let contents = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read payload from stdin")?;
        buf
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
    };

    let is_yaml = Path::new(input)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let value = if is_yaml {
        serde_yaml::from_str(&contents).with_context(|| format!("{} is not valid YAML", input))?
    } else {
        serde_json::from_str(&contents).with_context(|| format!("{} is not valid JSON", input))?
    };

    tracing::debug!(input, yaml = is_yaml, "Payload decoded");
    Ok(value)
}
