//! joi-schema CLI
//!
//! Command-line interface for transcoding schemas between JSON Schema
//! flavors and Joi-style validator descriptions.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use joi_schema::{
    is_url, load_schema_auto, save_description, transcode, Error, SchemaDialect,
};

#[derive(Parser)]
#[command(name = "joi-schema")]
#[command(about = "Convert schemas between JSON Schema and Joi-style validator descriptions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a schema
    Convert {
        /// Schema source: file path or URL (http:// or https://)
        #[arg(long)]
        source: String,

        /// Location to save output (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Source schema type (joi, json, json-draft-04, json-draft-2019-09, open-api)
        #[arg(long, default_value = "json")]
        source_type: String,

        /// Output schema type (joi, json, json-draft-04, json-draft-2019-09, open-api)
        #[arg(long, default_value = "joi")]
        output_type: String,
    },

    /// Fetch a schema from a URL and print its validator description
    Create {
        /// Schema source URL
        #[arg(long)]
        source: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert {
            source,
            output,
            source_type,
            output_type,
        } => run_convert(&source, output, &source_type, &output_type),

        Commands::Create { source } => run_create(&source),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_convert(
    source: &str,
    output: Option<PathBuf>,
    source_type: &str,
    output_type: &str,
) -> Result<(), u8> {
    let (Some(source_dialect), Some(output_dialect)) = (
        SchemaDialect::parse(source_type),
        SchemaDialect::parse(output_type),
    ) else {
        eprintln!(
            "Error: unknown conversion type: {} -> {}",
            source_type, output_type
        );
        return Err(2);
    };

    let document = load_schema_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let result = transcode(&document, source_dialect, output_dialect).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    match output {
        Some(path) => {
            save_description(&path, &result).map_err(|e| {
                eprintln!("Error: {}", e);
                Error::from(e).exit_code() as u8
            })?;
            println!("Schema saved to: {}", path.display());
        }
        None => {
            let pretty = serde_json::to_string_pretty(&result).map_err(|e| {
                eprintln!("Error serializing output: {}", e);
                2u8
            })?;
            println!("{}", pretty);
        }
    }

    Ok(())
}

fn run_create(source: &str) -> Result<(), u8> {
    if !is_url(source) {
        eprintln!("Error: the --source argument must be a valid URL");
        return Err(2);
    }

    let document = load_schema_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let result = transcode(&document, SchemaDialect::Json, SchemaDialect::Joi).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let pretty = serde_json::to_string_pretty(&result).map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;
    println!("{}", pretty);

    Ok(())
}
