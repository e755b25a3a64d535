// ==============================================================================
// index.rs - Chromosome / Position Index
// ==============================================================================
// Description: Groups loci into contiguous chromosome runs, records the row
//              offset of each run, and validates position ordering
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================
// A run is a maximal block of consecutive rows sharing one chromosome label.
// Labels may recur in later runs; each recurrence is a new run:
//
//   chr1 10, chr1 20, chr2 5, chr1 30  ->  runs [chr1, chr2, chr1]
//                                          starts [0, 2, 3]
//
// A selected subset keeps each row in its source run, so two neighbouring
// runs may then share a label.
// ==============================================================================

use serde::Serialize;
use std::ops::Range;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Chromosome runs, their positions and row offsets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChromIndex {
    chromosomes: Vec<String>,
    positions: Vec<Vec<u64>>,
    chrom_starts: Vec<usize>,
}

impl ChromIndex {
    /// Build the index from loci in row order
    pub fn build<'a, I>(loci: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut index = Self::default();

        for (chrom, position) in loci {
            let same_run = index.chromosomes.last().is_some_and(|last| last == chrom);
            if !same_run {
                index.chromosomes.push(chrom.to_string());
                index.positions.push(Vec::new());
            }
            index
                .positions
                .last_mut()
                .expect("a chromosome run is open before positions are recorded")
                .push(position);
        }

        index.chrom_starts = Self::starts_of(&index.positions);

        assert_eq!(index.chromosomes.len(), index.positions.len());
        assert_eq!(index.chromosomes.len(), index.chrom_starts.len());
        index
    }

    fn starts_of(positions: &[Vec<u64>]) -> Vec<usize> {
        positions
            .iter()
            .scan(0usize, |offset, run| {
                let start = *offset;
                *offset += run.len();
                Some(start)
            })
            .collect()
    }

    /// Fail if any position does not strictly exceed its predecessor within
    /// the same run
    pub fn validate_ordering(&self, path: &Path) -> Result<()> {
        for (chrom, run) in self.chromosomes.iter().zip(&self.positions) {
            for pair in run.windows(2) {
                if pair[1] <= pair[0] {
                    return Err(IngestError::UnsortedPositions {
                        chrom: chrom.clone(),
                        previous: pair[0],
                        current: pair[1],
                        path: path.to_path_buf(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Chromosome label of each run, in first-seen order
    pub fn chromosomes(&self) -> &[String] {
        &self.chromosomes
    }

    /// Positions of each run
    pub fn positions(&self) -> &[Vec<u64>] {
        &self.positions
    }

    /// Row offset of the first row of each run
    pub fn chrom_starts(&self) -> &[usize] {
        &self.chrom_starts
    }

    /// Number of runs
    pub fn n_runs(&self) -> usize {
        self.chromosomes.len()
    }

    /// Total number of indexed loci
    pub fn n_loci(&self) -> usize {
        self.positions.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Row range covered by run `run`
    ///
    /// # Panics
    /// Panics if `run >= self.n_runs()`.
    pub fn run_range(&self, run: usize) -> Range<usize> {
        let start = self.chrom_starts[run];
        start..start + self.positions[run].len()
    }

    /// Whether any run labelled `chrom` contains `position`
    pub fn contains(&self, chrom: &str, position: u64) -> bool {
        self.chromosomes
            .iter()
            .zip(&self.positions)
            .filter(|(label, _)| label.as_str() == chrom)
            .any(|(_, run)| run.binary_search(&position).is_ok())
    }

    /// Index over the rows at `keep`
    ///
    /// Every kept row stays in the run it came from and runs left empty are
    /// dropped. Two runs that shared a label stay separate even when every
    /// row between them is dropped, so a subset of a validated index is
    /// itself valid.
    ///
    /// # Panics
    /// Panics if `keep` is not ascending or holds a row `>= self.n_loci()`.
    /// Callers validate `keep`.
    pub fn select(&self, keep: &[usize]) -> Self {
        let mut index = Self::default();
        let mut run = 0;
        let mut open_run = None;

        for &row in keep {
            while row >= self.chrom_starts[run] + self.positions[run].len() {
                run += 1;
            }
            if open_run != Some(run) {
                index.chromosomes.push(self.chromosomes[run].clone());
                index.positions.push(Vec::new());
                open_run = Some(run);
            }
            index
                .positions
                .last_mut()
                .expect("a chromosome run is open before positions are recorded")
                .push(self.positions[run][row - self.chrom_starts[run]]);
        }

        index.chrom_starts = Self::starts_of(&index.positions);
        index
    }

    /// Iterate `(chromosome, position)` in row order
    pub fn loci(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.chromosomes
            .iter()
            .zip(&self.positions)
            .flat_map(|(chrom, run)| run.iter().map(move |&pos| (chrom.as_str(), pos)))
    }
}
