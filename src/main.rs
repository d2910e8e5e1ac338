use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use spectral_chart::chart::html::write_html;
use spectral_chart::data::excitation::{PoleUnit, stick_series};
use spectral_chart::data::loader::load_excitations;
use spectral_chart::{Config, SpectrumKind, render};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the panels described by a TOML config into an HTML page
    Render {
        /// Path to the TOML configuration
        config: PathBuf,

        /// Override the output path from the config
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the Vega-Lite JSON to stdout instead of writing HTML
        #[arg(short, long, default_value_t = false)]
        json: bool,
    },

    /// Turn excitation results into a stick series for broadening
    Sticks {
        /// JSON array of per-state excitation records
        excitations: PathBuf,

        /// Which residues to extract: opa or ecd
        #[arg(short, long)]
        kind: SpectrumKind,

        /// Unit of the poles: au, ev or nm
        #[arg(short, long, default_value = "au")]
        units: PoleUnit,

        /// Write the sticks here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Args::parse().command {
        Command::Render {
            config,
            output,
            json,
        } => {
            let config = Config::load(&config)?;
            let spec = render(&config)?;
            if json {
                println!("{}", spec.to_json()?);
            } else {
                let path = output.unwrap_or_else(|| config.output.clone());
                write_html(&path, &spec)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
        }
        Command::Sticks {
            excitations,
            kind,
            units,
            output,
        } => {
            let records = load_excitations(&excitations)?;
            let sticks = stick_series(&records, kind, units)?;
            let text = serde_json::to_string_pretty(&sticks)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("wrote {} {kind} sticks to {}", sticks.len(), path.display());
                }
                None => println!("{text}"),
            }
        }
    }
    Ok(())
}
