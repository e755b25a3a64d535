// ==============================================================================
// parsers/vcf.rs - VCF-subset Reader
// ==============================================================================
// Description: Loads per-site allele depths, VQSLOD and population allele
//              frequency for one sample from a plain or gzipped VCF
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================
// References:
// - VCF 4.2 Spec: https://samtools.github.io/hts-specs/VCFv4.2.pdf
// ==============================================================================
// Pipeline:
//   InputLines::open -> VcfHeader::parse -> parse_records -> index_records
//   -> ChromIndex::validate_ordering
// Only CHROM, POS, INFO/VQSLOD, INFO/AF and the sample's FORMAT/AD are
// interpreted; everything else is carried as raw text.
// ==============================================================================

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::index::ChromIndex;
use crate::input::InputLines;
use crate::models::{check_selection, MarkerSet, VariantColumns};
use crate::parsers::subfield::{
    allele_depth_position, extract_allele_depths, extract_info, parse_position,
};
use crate::parsers::tokenizer::{fields_up_to, tokenize, VCF_COLUMNS};

/// Fixed leading columns of the `#CHROM` header line
pub const EXPECTED_COLUMNS: [&str; 9] = [
    "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];

/// Zero-based index of the first sample column
pub const FIRST_SAMPLE_COLUMN: usize = EXPECTED_COLUMNS.len();

/// Parsed VCF header
#[derive(Debug, Clone, PartialEq)]
pub struct VcfHeader {
    /// `##` meta lines, verbatim
    pub meta_lines: Vec<String>,

    /// Column names of the `#CHROM` line up to and including the active
    /// sample
    pub columns: Vec<String>,

    /// Name of the active sample
    pub sample_name: String,

    /// Zero-based column index of the active sample
    pub sample_column: usize,
}

impl VcfHeader {
    /// Consume meta lines and validate the column header line
    ///
    /// # Arguments
    /// * `lines` - Stream positioned at the start of the file
    /// * `sample` - Sample to select; `None` selects the first sample column
    pub fn parse(lines: &mut InputLines, sample: Option<&str>) -> Result<Self> {
        let mut meta_lines = Vec::new();

        let column_line = loop {
            match lines.next_line()? {
                Some(line) if line.starts_with("##") => meta_lines.push(line),
                Some(line) => break line,
                None => {
                    return Err(IngestError::VcfInvalidHeaderFieldNames {
                        expected: EXPECTED_COLUMNS[0].to_string(),
                        found: String::new(),
                    })
                }
            }
        };

        debug!("{} meta lines in the VCF header", meta_lines.len());
        Self::from_column_line(&column_line, meta_lines, sample, lines.path())
    }

    fn from_column_line(
        line: &str,
        meta_lines: Vec<String>,
        sample: Option<&str>,
        path: &Path,
    ) -> Result<Self> {
        let columns = tokenize(line, VCF_COLUMNS);

        for (index, expected) in EXPECTED_COLUMNS.iter().enumerate() {
            let found = columns.get(index).copied().unwrap_or_default();
            if found != *expected {
                return Err(IngestError::VcfInvalidHeaderFieldNames {
                    expected: expected.to_string(),
                    found: found.to_string(),
                });
            }
        }

        let sample_column = match sample {
            None => Some(FIRST_SAMPLE_COLUMN).filter(|&column| column < columns.len()),
            Some(name) => columns
                .iter()
                .skip(FIRST_SAMPLE_COLUMN)
                .position(|&column| column == name)
                .map(|offset| FIRST_SAMPLE_COLUMN + offset),
        };

        let sample_column = sample_column.ok_or_else(|| IngestError::InvalidSampleInVcf {
            sample: sample.unwrap_or_default().to_string(),
            path: path.to_path_buf(),
        })?;

        Ok(Self {
            meta_lines,
            columns: columns[..=sample_column].iter().map(|c| c.to_string()).collect(),
            sample_name: columns[sample_column].to_string(),
            sample_column,
        })
    }
}

/// One variant line
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub chrom: String,

    /// POS as written; integer-parsed during indexing
    pub pos: String,

    pub id: String,
    pub ref_allele: String,
    pub alt_allele: String,
    pub qual: String,
    pub filter: String,

    /// Raw INFO column
    pub info: String,

    /// Raw FORMAT column
    pub format: String,

    /// VQSLOD from INFO (mandatory)
    pub vqslod: f64,

    /// AF from INFO, only when requested
    pub plaf: Option<f64>,

    /// Reference allele depth (AD, first entry)
    pub ref_depth: u32,

    /// Alternate allele depth (AD, second entry)
    pub alt_depth: u32,
}

impl VariantRecord {
    /// Parse one data line
    ///
    /// `line_number` is the 1-based line in the file, used for error
    /// context. Columns after `sample_column` are never read.
    pub fn from_line(
        line: &str,
        line_number: usize,
        sample_column: usize,
        extract_plaf: bool,
    ) -> Result<Self> {
        let fields: Vec<&str> = fields_up_to(line, VCF_COLUMNS, sample_column + 1).collect();
        if fields.len() <= sample_column || sample_column < FIRST_SAMPLE_COLUMN {
            return Err(IngestError::VcfLineTooShort {
                line: line_number,
                found: fields.len(),
                sample_column,
            });
        }

        let info = fields[7];
        let format = fields[8];

        let info_values = extract_info(info, extract_plaf)?;
        let ad_position = allele_depth_position(format)?;
        let (ref_depth, alt_depth) = extract_allele_depths(fields[sample_column], ad_position)?;

        Ok(Self {
            chrom: fields[0].to_string(),
            pos: fields[1].to_string(),
            id: fields[2].to_string(),
            ref_allele: fields[3].to_string(),
            alt_allele: fields[4].to_string(),
            qual: fields[5].to_string(),
            filter: fields[6].to_string(),
            info: info.to_string(),
            format: format.to_string(),
            vqslod: info_values.vqslod,
            plaf: info_values.plaf,
            ref_depth,
            alt_depth,
        })
    }

    /// Integer position, validated like a tabular POS column
    pub fn position(&self, path: &Path) -> Result<u64> {
        parse_position(&self.pos, path)
    }
}

/// Read every data line after the header
///
/// Stops at end of input or at the first empty line. The stream is consumed
/// and closed when this returns.
pub fn parse_records(
    mut lines: InputLines,
    header: &VcfHeader,
    extract_plaf: bool,
) -> Result<Vec<VariantRecord>> {
    let mut records = Vec::new();
    while let Some(line) = lines.next_data_line()? {
        records.push(VariantRecord::from_line(
            &line,
            lines.line_number(),
            header.sample_column,
            extract_plaf,
        )?);
    }

    debug!("Read {} data lines from {}", records.len(), lines.path().display());
    Ok(records)
}

/// Build the chromosome index from parsed records
pub fn index_records(records: &[VariantRecord], path: &Path) -> Result<ChromIndex> {
    let positions = records
        .iter()
        .map(|record| record.position(path))
        .collect::<Result<Vec<u64>>>()?;

    Ok(ChromIndex::build(
        records.iter().map(|record| record.chrom.as_str()).zip(positions),
    ))
}

/// Flat ref/alt/VQSLOD/PLAF arrays in record order
pub fn columns_of(records: &[VariantRecord]) -> VariantColumns {
    VariantColumns {
        ref_count: records.iter().map(|r| f64::from(r.ref_depth)).collect(),
        alt_count: records.iter().map(|r| f64::from(r.alt_depth)).collect(),
        vqslod: records.iter().map(|r| r.vqslod).collect(),
        plaf: records.iter().map(|r| r.plaf).collect(),
    }
}

/// Variants loaded from one VCF, with their index and flat columns
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSet {
    path: PathBuf,
    header: VcfHeader,
    records: Vec<VariantRecord>,
    index: ChromIndex,
    columns: VariantColumns,
}

impl VariantSet {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &VcfHeader {
        &self.header
    }

    pub fn records(&self) -> &[VariantRecord] {
        &self.records
    }

    pub fn columns(&self) -> &VariantColumns {
        &self.columns
    }

    pub fn sample_name(&self) -> &str {
        &self.header.sample_name
    }
}

impl MarkerSet for VariantSet {
    fn index(&self) -> &ChromIndex {
        &self.index
    }

    fn subset(&self, keep: &[usize]) -> Result<Self> {
        check_selection(keep, self.records.len())?;

        let records: Vec<VariantRecord> =
            keep.iter().map(|&row| self.records[row].clone()).collect();
        let index = self.index.select(keep);

        info!(
            "Kept {} of {} variants from {}",
            records.len(),
            self.records.len(),
            self.path.display()
        );

        Ok(Self {
            path: self.path.clone(),
            header: self.header.clone(),
            columns: columns_of(&records),
            records,
            index,
        })
    }
}

/// VCF reader with configuration options
#[derive(Debug, Clone, Default)]
pub struct VcfReader {
    /// Sample to load; None selects the first sample column
    pub sample: Option<String>,

    /// Extract INFO/AF as the population allele frequency
    pub extract_plaf: bool,
}

impl VcfReader {
    /// Create new VCF reader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a sample by name (an empty name selects the first sample)
    pub fn with_sample(mut self, sample: impl Into<String>) -> Self {
        self.sample = Some(sample.into()).filter(|name: &String| !name.is_empty());
        self
    }

    /// Request INFO/AF extraction
    pub fn with_plaf(mut self, extract_plaf: bool) -> Self {
        self.extract_plaf = extract_plaf;
        self
    }

    /// Load a VCF file (plain or gzipped)
    ///
    /// # Example
    /// ```no_run
    /// use variant_ingest::parsers::VcfReader;
    /// use variant_ingest::MarkerSet;
    ///
    /// let variants = VcfReader::new()
    ///     .with_sample("PG0390-C")
    ///     .with_plaf(true)
    ///     .read("PG0390-C.vcf.gz")?;
    /// println!("Loaded {} sites", variants.n_loci());
    /// # Ok::<(), variant_ingest::IngestError>(())
    /// ```
    pub fn read(&self, path: impl AsRef<Path>) -> Result<VariantSet> {
        let path = path.as_ref();

        let mut lines = InputLines::open(path)?;
        let header = VcfHeader::parse(&mut lines, self.sample.as_deref())?;
        info!(
            "Reading sample {} (column {}) from {}{}",
            header.sample_name,
            header.sample_column,
            path.display(),
            if lines.is_compressed() { " [gzip]" } else { "" }
        );

        let records = parse_records(lines, &header, self.extract_plaf)?;
        if records.is_empty() {
            return Err(IngestError::EmptyInputFile {
                path: path.to_path_buf(),
            });
        }

        let index = index_records(&records, path)?;
        index.validate_ordering(path)?;

        info!(
            "Loaded {} variants on {} chromosomes from {}",
            records.len(),
            index.n_runs(),
            path.display()
        );

        Ok(VariantSet {
            path: path.to_path_buf(),
            columns: columns_of(&records),
            header,
            records,
            index,
        })
    }
}
