// ==============================================================================
// lib.rs - Variant Ingest Library
// ==============================================================================
// Description: Library interface for VCF / tabular site data ingestion
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================

pub mod config;
pub mod error;
pub mod filter;
pub mod index;
pub mod input;
pub mod models;
pub mod parsers;

pub use error::{AlleleDepthError, IngestError, Result};
pub use filter::SelectionPolicy;
pub use index::ChromIndex;
pub use models::{MarkerSet, VariantColumns};
