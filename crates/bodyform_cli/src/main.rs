//! Bodyform CLI
//!
//! Slider schema dump, bucket classification, trapezoid lookup and full
//! body evaluation from a JSON request file.

use anyhow::{Context, Result};
use bodyform_core::classification::BucketTag;
use bodyform_core::morph::trapezoid_lookup;
use bodyform_core::{define_schema, evaluate_body_json_with_config, EngineConfig, Gender};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bodyform")]
#[command(about = "Evaluate body measurement profiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the slider schema for a gender as JSON
    Schema {
        /// female or male
        #[arg(long)]
        gender: Gender,
    },

    /// Classify a slider value into its bucket label
    Classify {
        /// Bucket tag (e.g. "head", "breastSize", "hipSize")
        #[arg(long)]
        tag: String,

        #[arg(long, allow_negative_numbers = true)]
        value: f32,
    },

    /// Look up the trapezoid weight for shoulder/neck sliders
    Trapezoid {
        #[arg(long)]
        width: f32,

        #[arg(long)]
        height: f32,

        #[arg(long)]
        neck: f32,
    },

    /// Evaluate a JSON body evaluation request
    Evaluate {
        /// Request JSON file path
        #[arg(long)]
        request: PathBuf,

        /// Pretty-print the response
        #[arg(long, default_value = "false")]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Schema { gender } => {
            let schema = define_schema(gender);
            println!("{}", serde_json::to_string_pretty(schema)?);
        }

        Commands::Classify { tag, value } => {
            let tag = BucketTag::parse(&tag)
                .with_context(|| format!("unknown bucket tag: {}", tag))?;
            let bucket = tag.bucket(value);
            println!("{}", bucket.as_str());
            if !bucket.is_classified() {
                eprintln!("warning: {} = {} is outside every bucket", tag.as_str(), value);
            }
        }

        Commands::Trapezoid { width, height, neck } => match trapezoid_lookup(width, height, neck) {
            Some(weight) => println!("{}", weight),
            None => {
                println!("0");
                eprintln!("warning: inputs fall outside every trapezoid band");
            }
        },

        Commands::Evaluate { request, pretty } => {
            let response = evaluate_file(&request, &EngineConfig::from_env())?;
            if pretty {
                let value: serde_json::Value = serde_json::from_str(&response)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", response);
            }
        }
    }

    Ok(())
}

fn evaluate_file(path: &Path, config: &EngineConfig) -> Result<String> {
    let request = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))?;
    let response = evaluate_body_json_with_config(&request, config)
        .with_context(|| format!("evaluation of {} failed", path.display()))?;
    Ok(response)
}
