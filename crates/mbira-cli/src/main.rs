//! mbira - render kalimba tablature from notation files
//!
//! Subcommands:
//! - `mbira render <input>` - Render notation to an SVG tablature
//! - `mbira check <input>` - Parse notation and print the symbol list

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use mbira::LayoutParams;

#[derive(Parser)]
#[command(name = "mbira")]
#[command(about = "Kalimba tablature renderer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a notation file to an SVG tablature
    Render {
        /// Notation file to read
        input: PathBuf,

        /// SVG file to write
        #[arg(short, long, default_value = "out.svg")]
        output: PathBuf,

        /// Eighth beats per measure
        #[arg(short, long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..))]
        beats_per_measure: u32,

        /// Measures per tablature page
        #[arg(short, long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..))]
        measures_per_tab: u32,
    },

    /// Parse a notation file and print its symbols without rendering
    Check {
        /// Notation file to read
        input: PathBuf,

        /// Print the symbols as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            beats_per_measure,
            measures_per_tab,
        } => {
            let notation = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;

            let params = LayoutParams {
                beats_per_measure,
                measures_per_tab,
            };
            let svg = mbira::render_svg(&notation, &params)
                .with_context(|| format!("Failed to render {}", input.display()))?;

            fs::write(&output, svg)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!(input = %input.display(), output = %output.display(), "rendered");
        }

        Commands::Check { input, json } => {
            let notation = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;

            let symbols = mbira::parse(&notation)
                .with_context(|| format!("Failed to parse {}", input.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&symbols)?);
            } else {
                for symbol in &symbols {
                    println!("{:?}", symbol);
                }
                println!("{} symbols", symbols.len());
            }
        }
    }

    Ok(())
}
