//! TDSP command-line entry point.
//!
//! # Responsibility
//! - Run the schema generators against the active registry from a shell.
//! - Apply `TDSP_*` environment configuration before any command runs.
//!
//! # Invariants
//! - Generated artifacts go to stdout; diagnostics go to stderr.
//! - Exit status is non-zero whenever a command fails.

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tdsp_core::{
    build_ai_prompt, build_filter_options, build_manual_form, collect_form_with_mode,
    filter_options, init_logging, render_custom_fields_detail, CategoryLookup, CollectMode,
    CoreConfig, Record, SchemaRegistry,
};

#[derive(Parser, Debug)]
#[command(name = "tdsp")]
#[command(about = "Test data schema generators", version, long_about = None)]
struct Args {
    /// Schema registry JSON replacing the built-in schema
    #[arg(long, global = true, env = "TDSP_SCHEMA_PATH")]
    schema: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the extraction prompt
    Prompt,
    /// Print the manual-entry form markup
    Form,
    /// Print the choices of one enum set
    Filter {
        enum_key: String,
        /// Print `<option>` markup instead of one value per line
        #[arg(long)]
        html: bool,
    },
    /// Print the custom-field catalog of a category
    Fields { category: String },
    /// Collect a JSON object of control values into a record
    Collect {
        controls: PathBuf,
        /// Reject malformed nested JSON instead of substituting empty values
        #[arg(long)]
        strict: bool,
    },
    /// Print the custom-fields detail markup of a record
    Detail { record: PathBuf },
    /// Check a record for completeness
    Validate { record: PathBuf },
    /// Print the active schema registry as JSON
    Schema,
    /// Print crate and schema versions
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = CoreConfig::from_env()?;

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(config.log_level, &log_dir.to_string_lossy())?;
    }
    let schema_path = args.schema.as_deref().or(config.schema_path.as_deref());
    let registry = match schema_path {
        Some(path) => {
            let raw = read_file(path)?;
            SchemaRegistry::install_global(SchemaRegistry::from_json_str(&raw)?)?
        }
        None => SchemaRegistry::global(),
    };

    match args.command {
        Command::Prompt => println!("{}", build_ai_prompt(registry)),
        Command::Form => println!("{}", build_manual_form(registry)),
        Command::Filter { enum_key, html } => {
            if html {
                println!("{}", build_filter_options(registry, &enum_key));
            } else {
                for value in filter_options(registry, &enum_key) {
                    println!("{value}");
                }
            }
        }
        Command::Fields { category } => {
            let lookup = registry.category(&category);
            match lookup {
                CategoryLookup::Active(_) => {}
                CategoryLookup::Deactivated(_) => {
                    eprintln!("category is deactivated: {}", category.trim())
                }
                CategoryLookup::Unknown => eprintln!("category is unknown: {}", category.trim()),
            }
            for field in lookup.fields() {
                println!("{}\t{}\t{}", field.key, field.type_label(), field.description);
            }
        }
        Command::Collect { controls, strict } => {
            let raw = read_file(&controls)?;
            let values: BTreeMap<String, String> = serde_json::from_str(&raw)
                .map_err(|e| format!("Failed to parse {}: {}", controls.display(), e))?;
            let mode = if strict {
                CollectMode::Strict
            } else {
                config.collect_mode
            };
            let collected = collect_form_with_mode(registry, &values, mode)?;
            for fallback in &collected.fallbacks {
                eprintln!(
                    "replaced malformed {} `{}` with an empty value: {}",
                    fallback.shape.as_str(),
                    fallback.key,
                    fallback.reason
                );
            }
            println!("{}", serde_json::to_string_pretty(&collected.record)?);
        }
        Command::Detail { record } => {
            let record = read_record(&record)?;
            println!("{}", render_custom_fields_detail(registry, &record));
        }
        Command::Validate { record } => {
            let record = read_record(&record)?;
            for key in record.missing_required_fields(registry) {
                eprintln!("missing required field: {key}");
            }
            record.validate(registry)?;
            println!("record is complete");
        }
        Command::Schema => println!("{}", registry.to_json_pretty()?),
        Command::Version => {
            println!("tdsp_core version={}", tdsp_core::core_version());
            println!("schema version={}", registry.version());
        }
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn read_record(path: &Path) -> Result<Record, String> {
    let raw = read_file(path)?;
    Record::from_json_str(&raw).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::{Args, Command};
    use clap::Parser;

    #[test]
    fn parses_filter_and_collect_flags() {
        let args = Args::try_parse_from(["tdsp", "filter", "result_summary", "--html"])
            .expect("filter args");
        assert!(matches!(
            args.command,
            Command::Filter { ref enum_key, html: true } if enum_key == "result_summary"
        ));

        let args = Args::try_parse_from(["tdsp", "collect", "controls.json", "--strict"])
            .expect("collect args");
        assert!(matches!(args.command, Command::Collect { strict: true, .. }));
    }

    #[test]
    fn rejects_missing_positional() {
        assert!(Args::try_parse_from(["tdsp", "detail"]).is_err());
    }
}
