// ==============================================================================
// main.rs - Variant Ingest Entry Point
// ==============================================================================
// Description: Loads a VCF or tabular site file, optionally filters it, and
//              prints a JSON summary of the resulting chromosome index
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use variant_ingest::config::LoadConfig;
use variant_ingest::parsers::TabularReader;
use variant_ingest::{ChromIndex, MarkerSet, SelectionPolicy};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load one sample's allele depths from a VCF
    Vcf {
        /// VCF file (plain or gzipped)
        path: PathBuf,

        /// JSON config file; command-line options override it
        #[arg(long, env = "VARIANT_INGEST_CONFIG")]
        config: Option<PathBuf>,

        /// Sample column to load (default: first sample)
        #[arg(short, long, env = "VARIANT_INGEST_SAMPLE")]
        sample: Option<String>,

        /// Extract INFO/AF as population allele frequency
        #[arg(long)]
        plaf: bool,

        /// Keep only sites with VQSLOD above this value
        #[arg(long)]
        vqslod: Option<f64>,

        /// Restrict VQSLOD selection to chromosome runs after the tenth
        #[arg(long, requires = "vqslod")]
        half: bool,

        /// CHROM/POS file of sites to drop
        #[arg(long)]
        exclude: Option<PathBuf>,
    },

    /// Load a CHROM/POS-prefixed delimited table
    Table {
        /// Table file (plain or gzipped)
        path: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct ChromSummary<'a> {
    chrom: &'a str,
    start: usize,
    sites: usize,
    first: Option<u64>,
    last: Option<u64>,
}

#[derive(Debug, Serialize)]
struct LoadSummary<'a> {
    path: String,
    sample: Option<&'a str>,
    loci: usize,
    chromosomes: Vec<ChromSummary<'a>>,
}

fn summarize<'a>(path: PathBuf, sample: Option<&'a str>, index: &'a ChromIndex) -> LoadSummary<'a> {
    let chromosomes = index
        .chromosomes()
        .iter()
        .zip(index.positions())
        .zip(index.chrom_starts())
        .map(|((chrom, positions), &start)| ChromSummary {
            chrom,
            start,
            sites: positions.len(),
            first: positions.first().copied(),
            last: positions.last().copied(),
        })
        .collect();

    LoadSummary {
        path: path.display().to_string(),
        sample,
        loci: index.n_loci(),
        chromosomes,
    }
}

fn vcf_config(
    config: Option<PathBuf>,
    sample: Option<String>,
    plaf: bool,
    vqslod: Option<f64>,
    half: bool,
    exclude: Option<PathBuf>,
) -> Result<LoadConfig> {
    let mut load = match config {
        Some(path) => LoadConfig::from_json_file(path)?,
        None => LoadConfig::default(),
    };

    if sample.is_some() {
        load.sample = sample;
    }
    load.extract_plaf |= plaf;
    if let Some(threshold) = vqslod {
        load.selection = Some(if half {
            SelectionPolicy::VqslodHalf { threshold }
        } else {
            SelectionPolicy::Vqslod { threshold }
        });
    }
    if exclude.is_some() {
        load.exclude = exclude;
    }

    Ok(load)
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "variant_ingest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let json = match args.command {
        Command::Vcf {
            path,
            config,
            sample,
            plaf,
            vqslod,
            half,
            exclude,
        } => {
            let load = vcf_config(config, sample, plaf, vqslod, half, exclude)?;

            let mut variants = load
                .vcf_reader()
                .read(&path)
                .with_context(|| format!("Failed to load VCF {}", path.display()))?;

            for policy in load.policies()? {
                variants = policy
                    .apply(&variants)
                    .with_context(|| format!("Failed to apply {} selection", policy.name()))?;
            }

            info!("{} sites retained", variants.n_loci());
            serde_json::to_string_pretty(&summarize(
                path,
                Some(variants.sample_name()),
                variants.index(),
            ))?
        }
        Command::Table { path } => {
            let table = TabularReader::new()
                .read(&path)
                .with_context(|| format!("Failed to load table {}", path.display()))?;
            serde_json::to_string_pretty(&summarize(path, None, table.index()))?
        }
    };

    println!("{}", json);
    Ok(())
}
