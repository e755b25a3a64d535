// ==============================================================================
// models.rs - Shared Marker Data Models
// ==============================================================================
// Description: Traits and flat column types shared by the VCF and tabular
//              record sets
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================

use serde::Serialize;

use crate::error::{IngestError, Result};
use crate::index::ChromIndex;

/// A loaded, indexed set of markers (one row per locus)
///
/// Sets are immutable once loaded. Filtering never mutates a set in place:
/// [`MarkerSet::subset`] returns a new set holding only the kept rows, with
/// its chromosome index and derived columns rebuilt.
pub trait MarkerSet: Sized {
    /// Chromosome / position index over the rows
    fn index(&self) -> &ChromIndex;

    /// Keep only the rows at `keep`
    ///
    /// `keep` must be strictly increasing and every entry must be a valid
    /// row; relative row order is preserved.
    fn subset(&self, keep: &[usize]) -> Result<Self>;

    /// Number of loci (rows)
    fn n_loci(&self) -> usize {
        self.index().n_loci()
    }
}

/// Validate a row selection against a set of `n_loci` rows
pub fn check_selection(keep: &[usize], n_loci: usize) -> Result<()> {
    if let Some(pair) = keep.windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(IngestError::InvalidMarkerSelection(format!(
            "indices must be strictly increasing, found {} after {}",
            pair[1], pair[0]
        )));
    }

    if let Some(&last) = keep.last() {
        if last >= n_loci {
            return Err(IngestError::InvalidMarkerSelection(format!(
                "index {} out of range for {} loci",
                last, n_loci
            )));
        }
    }

    Ok(())
}

/// Flat per-locus arrays consumed by downstream analysis
///
/// All four vectors are indexed like the record sequence they were built
/// from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VariantColumns {
    /// Reference allele depth per locus
    pub ref_count: Vec<f64>,

    /// Alternate allele depth per locus
    pub alt_count: Vec<f64>,

    /// VQSLOD quality score per locus
    pub vqslod: Vec<f64>,

    /// Population allele frequency per locus
    /// None where AF was absent or not requested
    pub plaf: Vec<Option<f64>>,
}

impl VariantColumns {
    pub fn len(&self) -> usize {
        self.vqslod.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vqslod.is_empty()
    }
}
