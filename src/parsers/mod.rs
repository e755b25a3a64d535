// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Readers for VCF-subset and delimited tabular site files
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================

pub mod tokenizer;
pub mod subfield;
pub mod vcf;
pub mod tabular;

pub use vcf::{VariantRecord, VariantSet, VcfHeader, VcfReader};
pub use tabular::{TabularReader, TabularRow, TabularSet};
