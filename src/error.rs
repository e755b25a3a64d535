// ==============================================================================
// error.rs - Ingestion Error Kinds
// ==============================================================================
// Description: Every failure that aborts a VCF or tabular file load
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the ingestion pipeline
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that abort a file load
///
/// None of these are retried and there is no row-level skip: the first
/// error ends the whole load.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Invalid input file: {}: {source}", .path.display())]
    InvalidInputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Position '{value}' in {} uses scientific notation", .path.display())]
    BadScientificNotation { value: String, path: PathBuf },

    #[error("Position '{value}' in {} is not an integer", .path.display())]
    BadConversion { value: String, path: PathBuf },

    #[error("VCF header field name mismatch: expected '{expected}', found '{found}'")]
    VcfInvalidHeaderFieldNames { expected: String, found: String },

    #[error("Sample '{sample}' not found in {}", .path.display())]
    InvalidSampleInVcf { sample: String, path: PathBuf },

    #[error("VQSLOD not found in INFO field: {info}")]
    VcfVQSLODNotFound { info: String },

    #[error("AD not found in FORMAT field: {format}")]
    VcfCoverageFieldNotFound { format: String },

    #[error("Error parsing VCF AD field '{value}'")]
    VcfBadAlleleDepth {
        value: String,
        #[source]
        source: AlleleDepthError,
    },

    #[error("Invalid value for INFO key {key}: '{value}'")]
    VcfBadInfoValue { key: String, value: String },

    #[error("VCF line {line} has {found} columns, sample column is {sample_column}")]
    VcfLineTooShort {
        line: usize,
        found: usize,
        sample_column: usize,
    },

    #[error(
        "Positions not sorted on chromosome {chrom} in {}: {current} follows {previous}",
        .path.display()
    )]
    UnsortedPositions {
        chrom: String,
        previous: u64,
        current: u64,
        path: PathBuf,
    },

    #[error("No data rows in {}", .path.display())]
    EmptyInputFile { path: PathBuf },

    #[error("Invalid marker selection: {0}")]
    InvalidMarkerSelection(String),
}

/// Underlying cause of a malformed AD sub-field
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlleleDepthError {
    #[error("there should be exactly 2 AD entries, but found {0}; wrong number of ALT alleles")]
    WrongCount(usize),

    #[error("bad allele count '{value}': {source}")]
    BadCount {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("sample column has no sub-field at AD position {0}")]
    Missing(usize),
}
