// ==============================================================================
// demos/vcf_sites.rs - VCF site loading demo
// ==============================================================================
// Description: Load one sample from a VCF and report depth / VQSLOD totals
// Author: Matt Barham
// Created: 2026-10-19
// ==============================================================================

use std::env;

use variant_ingest::filter::select_by_vqslod;
use variant_ingest::parsers::VcfReader;
use variant_ingest::MarkerSet;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <vcf_file> [vqslod_threshold]", args[0]);
        eprintln!("\nExample:");
        eprintln!("  cargo run --example vcf_sites -- PG0390-C.eg.vcf.gz 8");
        std::process::exit(1);
    }

    let threshold: f64 = args.get(2).map(|t| t.parse::<f64>()).transpose()?.unwrap_or(0.0);

    let variants = VcfReader::new().with_plaf(true).read(&args[1])?;
    let columns = variants.columns();

    println!("Sample: {}", variants.sample_name());
    println!("Sites: {}", variants.n_loci());
    for (chrom, range) in variants
        .index()
        .chromosomes()
        .iter()
        .enumerate()
        .map(|(run, chrom)| (chrom, variants.index().run_range(run)))
    {
        let ref_total: f64 = columns.ref_count[range.clone()].iter().sum();
        let alt_total: f64 = columns.alt_count[range.clone()].iter().sum();
        println!(
            "  {:<16} {:>7} sites  ref={:<10} alt={}",
            chrom,
            range.len(),
            ref_total,
            alt_total
        );
    }

    let keep = select_by_vqslod(&columns.vqslod, threshold);
    let kept = variants.subset(&keep)?;
    println!("\nVQSLOD > {}: {} of {} sites kept", threshold, kept.n_loci(), variants.n_loci());

    Ok(())
}
