//! Form From Schema CLI
//!
//! Converts JSON Schema files into form definitions and validates form files.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use form_from_schema::{Form, FormConfig, OutputFormat, Schema, SchemaConverter};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "form-from-schema")]
#[command(about = "Convert JSON Schema into validated form definitions")]
struct Cli {
    /// Config file (layered over forms.toml and FORMS__* variables)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a JSON Schema file into a form definition
    Convert {
        /// Schema file (JSON)
        schema: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the form without validating it
        #[arg(long)]
        no_validate: bool,

        /// Compact JSON output
        #[arg(long)]
        compact: bool,
    },

    /// Validate a form definition file
    Validate {
        /// Form file (JSON)
        form: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        #[arg(default_value = "forms.toml")]
        output: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = FormConfig::load_from(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Convert { schema, output, no_validate, compact } => {
            let parsed = Schema::from_file(&schema)
                .with_context(|| format!("failed to read schema {}", schema.display()))?;

            let form = SchemaConverter::new(config.convert.clone()).convert_form(Some(&parsed))?;

            if !no_validate && config.validation.validate_after_convert {
                form.validate()
                    .with_context(|| format!("converted form from {} is invalid", schema.display()))?;
            }

            let json = if compact || config.output.format == OutputFormat::Compact {
                form.to_json()?
            } else {
                form.to_json_pretty()?
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, &json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    info!(fields = form.fields.len(), "wrote form to {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Validate { form } => {
            let content = std::fs::read_to_string(&form)
                .with_context(|| format!("failed to read form {}", form.display()))?;
            let parsed = Form::from_json(&content)?;
            parsed.validate()?;
            println!("✅ {} is valid ({} top-level fields)", form.display(), parsed.fields.len());
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                println!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigCommands::Init { output } => {
                FormConfig::default().save(&output)?;
                println!("✅ Created config file: {}", output);
            }
        },
    }

    Ok(())
}
