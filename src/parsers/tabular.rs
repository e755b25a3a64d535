// ==============================================================================
// parsers/tabular.rs - Delimited Tabular Reader
// ==============================================================================
// Description: Loads CHROM/POS-prefixed numeric tables (allele counts,
//              population frequencies, panels, exclusion lists)
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================
// Format: one header line, then rows separated by space, comma or tab
// Example:
//   CHROM    POS    PG0390-C
//   Pf3D7_01_v3    93157    85
//   Pf3D7_01_v3    94422    0
// Value columns are converted leniently: text that is not a number reads as
// 0.0 rather than failing the load.
// ==============================================================================

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::index::ChromIndex;
use crate::input::InputLines;
use crate::models::{check_selection, MarkerSet};
use crate::parsers::subfield::{lenient_float, parse_position};
use crate::parsers::tokenizer::{tokenize, TABULAR};

/// One parsed data row
#[derive(Debug, Clone, PartialEq)]
pub struct TabularRow {
    pub chrom: String,
    pub position: u64,
    pub values: Vec<f64>,
}

impl TabularRow {
    /// Parse one data line; `path` is only used for error context
    pub fn from_line(line: &str, path: &Path) -> Result<Self> {
        let fields = tokenize(line, TABULAR);
        let chrom = fields.first().copied().unwrap_or_default();
        let position = parse_position(fields.get(1).copied().unwrap_or_default(), path)?;
        let values = fields.iter().skip(2).map(|field| lenient_float(field)).collect();

        Ok(Self {
            chrom: chrom.to_string(),
            position,
            values,
        })
    }
}

/// Column labels beyond CHROM and POS
pub fn parse_header_labels(line: &str) -> Vec<String> {
    tokenize(line, TABULAR)
        .into_iter()
        .skip(2)
        .map(str::to_string)
        .collect()
}

/// Table loaded from one delimited file
#[derive(Debug, Clone, PartialEq)]
pub struct TabularSet {
    path: PathBuf,
    labels: Vec<String>,
    content: Vec<Vec<f64>>,
    info: Option<Vec<f64>>,
    index: ChromIndex,
}

impl TabularSet {
    fn new(path: PathBuf, labels: Vec<String>, content: Vec<Vec<f64>>, index: ChromIndex) -> Self {
        let info = single_column(&content);
        Self {
            path,
            labels,
            content,
            info,
            index,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header labels of the value columns
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Value rows, one per locus
    pub fn content(&self) -> &[Vec<f64>] {
        &self.content
    }

    /// One value per locus, present when every row has exactly one value
    pub fn info(&self) -> Option<&[f64]> {
        self.info.as_deref()
    }
}

fn single_column(content: &[Vec<f64>]) -> Option<Vec<f64>> {
    if content.is_empty() || content.iter().any(|row| row.len() != 1) {
        return None;
    }
    Some(content.iter().map(|row| row[0]).collect())
}

impl MarkerSet for TabularSet {
    fn index(&self) -> &ChromIndex {
        &self.index
    }

    fn subset(&self, keep: &[usize]) -> Result<Self> {
        check_selection(keep, self.content.len())?;

        let content: Vec<Vec<f64>> = keep.iter().map(|&row| self.content[row].clone()).collect();
        let index = self.index.select(keep);

        debug!(
            "Kept {} of {} rows from {}",
            content.len(),
            self.content.len(),
            self.path.display()
        );

        Ok(Self::new(self.path.clone(), self.labels.clone(), content, index))
    }
}

/// Reader for CHROM/POS-prefixed delimited tables
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularReader;

impl TabularReader {
    pub fn new() -> Self {
        Self
    }

    /// Load a table (plain or gzipped)
    ///
    /// # Example
    /// ```no_run
    /// use variant_ingest::parsers::TabularReader;
    ///
    /// let plaf = TabularReader::new().read("labStrains.test.PLAF.txt")?;
    /// let frequencies = plaf.info().expect("single value column");
    /// # Ok::<(), variant_ingest::IngestError>(())
    /// ```
    pub fn read(&self, path: impl AsRef<Path>) -> Result<TabularSet> {
        let path = path.as_ref();

        let (labels, rows) = {
            let mut lines = InputLines::open(path)?;
            let labels = lines
                .next_line()?
                .map(|line| parse_header_labels(&line))
                .unwrap_or_default();

            let mut rows = Vec::new();
            while let Some(line) = lines.next_data_line()? {
                rows.push(TabularRow::from_line(&line, path)?);
            }
            (labels, rows)
        };

        if rows.is_empty() {
            return Err(IngestError::EmptyInputFile {
                path: path.to_path_buf(),
            });
        }

        let index = ChromIndex::build(rows.iter().map(|row| (row.chrom.as_str(), row.position)));
        index.validate_ordering(path)?;

        let content: Vec<Vec<f64>> = rows.into_iter().map(|row| row.values).collect();
        let set = TabularSet::new(path.to_path_buf(), labels, content, index);

        info!(
            "Loaded {} rows on {} chromosomes from {}{}",
            set.n_loci(),
            set.index.n_runs(),
            path.display(),
            if set.info.is_some() { " (single column)" } else { "" }
        );

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::test_support::{create_gzip_test_file, create_test_file};

    #[test]
    fn test_parse_matrix() {
        let contents = "\
CHROM\tPOS\tPG0389-C\tPG0390-C
Pf3D7_01_v3\t93157\t85\t0
Pf3D7_01_v3\t94422\t100\t5
Pf3D7_02_v3\t95518\t20\t12
";
        let file = create_test_file(contents);
        let table = TabularReader::new().read(file.path()).unwrap();

        assert_eq!(table.labels(), &["PG0389-C".to_string(), "PG0390-C".to_string()]);
        assert_eq!(table.content(), &[vec![85.0, 0.0], vec![100.0, 5.0], vec![20.0, 12.0]]);
        assert!(table.info().is_none());

        let index = table.index();
        assert_eq!(index.chromosomes().len(), index.positions().len());
        assert_eq!(index.positions().iter().map(Vec::len).sum::<usize>(), 3);
        assert_eq!(index.chrom_starts(), &[0, 2]);
    }

    #[test]
    fn test_single_column_becomes_info() {
        let contents = "\
CHROM,POS,PLAF
Pf3D7_01_v3,93157,0.0190
Pf3D7_01_v3,94422,0.5
";
        let file = create_test_file(contents);
        let table = TabularReader::new().read(file.path()).unwrap();
        assert_eq!(table.info(), Some(&[0.019, 0.5][..]));
        assert_eq!(table.labels(), &["PLAF".to_string()]);
    }

    #[test]
    fn test_space_delimited_gzip() {
        let contents = "CHROM POS ALT\nchr1 10 3\nchr1 20 4\n";
        let file = create_gzip_test_file(contents);
        let table = TabularReader::new().read(file.path()).unwrap();
        assert_eq!(table.info(), Some(&[3.0, 4.0][..]));
    }

    #[test]
    fn test_lenient_values() {
        let contents = "CHROM POS A B\nchr1 10 NA 2.5x\n";
        let file = create_test_file(contents);
        let table = TabularReader::new().read(file.path()).unwrap();
        assert_eq!(table.content(), &[vec![0.0, 2.5]]);
    }

    #[test]
    fn test_position_errors() {
        let scientific = create_test_file("CHROM POS A\nchr1 1e3 1\n");
        assert!(matches!(
            TabularReader::new().read(scientific.path()),
            Err(IngestError::BadScientificNotation { .. })
        ));

        let text = create_test_file("CHROM POS A\nchr1 abc 1\n");
        match TabularReader::new().read(text.path()) {
            Err(IngestError::BadConversion { value, .. }) => assert_eq!(value, "abc"),
            other => panic!("Expected BadConversion, got {:?}", other),
        }

        let good = create_test_file("CHROM POS A\nchr1 12345 1\n");
        assert!(TabularReader::new().read(good.path()).is_ok());
    }

    #[test]
    fn test_unsorted_positions_fail() {
        for body in ["chr1 100 1\nchr1 100 1\n", "chr1 100 1\nchr1 99 1\n"] {
            let file = create_test_file(&format!("CHROM POS A\n{}", body));
            assert!(matches!(
                TabularReader::new().read(file.path()),
                Err(IngestError::UnsortedPositions { .. })
            ));
        }
    }

    #[test]
    fn test_marker_list_without_values() {
        let file = create_test_file("CHROM\tPOS\nchr1\t10\nchr2\t5\n");
        let table = TabularReader::new().read(file.path()).unwrap();
        assert!(table.labels().is_empty());
        assert_eq!(table.content(), &[Vec::<f64>::new(), Vec::new()]);
        assert!(table.info().is_none());
        assert!(table.index().contains("chr2", 5));
    }

    #[test]
    fn test_header_only() {
        let file = create_test_file("CHROM POS A\n");
        assert!(matches!(
            TabularReader::new().read(file.path()),
            Err(IngestError::EmptyInputFile { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            TabularReader::new().read("/nonexistent/plaf.txt"),
            Err(IngestError::InvalidInputFile { .. })
        ));
    }

    #[test]
    fn test_subset_keeps_info_in_sync() {
        let contents = "CHROM POS PLAF\nchr1 10 0.1\nchr1 20 0.2\nchr2 5 0.3\n";
        let file = create_test_file(contents);
        let table = TabularReader::new().read(file.path()).unwrap();

        let kept = table.subset(&[0, 2]).unwrap();
        assert_eq!(kept.info(), Some(&[0.1, 0.3][..]));
        assert_eq!(kept.index().chromosomes(), &["chr1".to_string(), "chr2".to_string()]);

        let all: Vec<usize> = (0..table.n_loci()).collect();
        assert_eq!(table.subset(&all).unwrap(), table);
    }

    #[test]
    fn test_subset_across_recurring_label() {
        let contents = "CHROM POS A\nchr1 10 1\nchr2 5 2\nchr1 5 3\n";
        let file = create_test_file(contents);
        let table = TabularReader::new().read(file.path()).unwrap();

        let kept = table.subset(&[0, 2]).unwrap();
        assert_eq!(kept.info(), Some(&[1.0, 3.0][..]));
        assert_eq!(kept.index().positions(), &[vec![10], vec![5]]);
    }
}
