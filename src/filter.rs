// ==============================================================================
// filter.rs - Marker Selection Policies
// ==============================================================================
// Description: Computes the row indices to keep; MarkerSet::subset applies
//              them
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================
// Policies:
//   Vqslod      - keep every site with VQSLOD strictly above the threshold
//   VqslodHalf  - as Vqslod, restricted to chromosome runs with ordinal
//                 greater than HALF_POLICY_MIN_RUN_ORDINAL
//   Excluding   - keep every site absent from an exclusion index
// ==============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::index::ChromIndex;
use crate::models::MarkerSet;
use crate::parsers::vcf::VariantSet;

/// Runs at or below this zero-based ordinal are skipped by the half policy
pub const HALF_POLICY_MIN_RUN_ORDINAL: usize = 10;

/// Indices of sites whose VQSLOD is strictly greater than `threshold`
///
/// # Example
/// ```
/// use variant_ingest::filter::select_by_vqslod;
///
/// assert_eq!(select_by_vqslod(&[5.0, 15.0, 8.0, 20.0], 10.0), vec![1, 3]);
/// ```
pub fn select_by_vqslod(vqslod: &[f64], threshold: f64) -> Vec<usize> {
    vqslod
        .iter()
        .enumerate()
        .filter(|&(_, &score)| score > threshold)
        .map(|(row, _)| row)
        .collect()
}

/// Like [`select_by_vqslod`], but only within runs whose ordinal exceeds
/// [`HALF_POLICY_MIN_RUN_ORDINAL`]
///
/// # Panics
/// Panics if `vqslod` is shorter than `index.n_loci()`.
pub fn select_by_vqslod_half(vqslod: &[f64], index: &ChromIndex, threshold: f64) -> Vec<usize> {
    (0..index.n_runs())
        .filter(|&run| run > HALF_POLICY_MIN_RUN_ORDINAL)
        .flat_map(|run| index.run_range(run))
        .filter(|&row| vqslod[row] > threshold)
        .collect()
}

/// Indices of loci in `index` that do not appear in `excluded`
pub fn select_excluding(index: &ChromIndex, excluded: &ChromIndex) -> Vec<usize> {
    index
        .loci()
        .enumerate()
        .filter(|(_, (chrom, position))| !excluded.contains(chrom, *position))
        .map(|(row, _)| row)
        .collect()
}

/// Named selection policy over a loaded variant set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Keep sites with VQSLOD above the threshold
    Vqslod { threshold: f64 },

    /// Keep sites with VQSLOD above the threshold on late chromosome runs only
    VqslodHalf { threshold: f64 },

    /// Keep sites not listed in an exclusion index
    #[serde(skip)]
    Excluding(ChromIndex),
}

impl SelectionPolicy {
    /// Row indices of `variants` retained by this policy
    pub fn select(&self, variants: &VariantSet) -> Vec<usize> {
        let keep = match self {
            SelectionPolicy::Vqslod { threshold } => {
                select_by_vqslod(&variants.columns().vqslod, *threshold)
            }
            SelectionPolicy::VqslodHalf { threshold } => {
                select_by_vqslod_half(&variants.columns().vqslod, variants.index(), *threshold)
            }
            SelectionPolicy::Excluding(excluded) => select_excluding(variants.index(), excluded),
        };

        debug!("{} keeps {} of {} sites", self.name(), keep.len(), variants.n_loci());
        keep
    }

    /// Select and subset in one step
    pub fn apply(&self, variants: &VariantSet) -> Result<VariantSet> {
        variants.subset(&self.select(variants))
    }

    pub fn name(&self) -> &'static str {
        match self {
            SelectionPolicy::Vqslod { .. } => "vqslod",
            SelectionPolicy::VqslodHalf { .. } => "vqslod_half",
            SelectionPolicy::Excluding(_) => "excluding",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::test_support::create_test_file;
    use crate::parsers::tabular::TabularReader;
    use crate::parsers::vcf::tests::vcf_with;
    use crate::parsers::vcf::VcfReader;

    fn site(chrom: &str, pos: u64, vqslod: f64) -> String {
        format!(
            "{}\t{}\t.\tA\tT\t.\tPASS\tVQSLOD={}\tGT:AD\t0/1:{},{}\t0/0:1,0\n",
            chrom, pos, vqslod, pos, pos + 1
        )
    }

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(select_by_vqslod(&[5.0, 15.0, 8.0, 20.0], 10.0), vec![1, 3]);
        assert_eq!(select_by_vqslod(&[10.0, 10.5], 10.0), vec![1]);
        assert!(select_by_vqslod(&[], 0.0).is_empty());
    }

    #[test]
    fn test_threshold_then_subset() {
        let body: String = [
            site("chr1", 10, 5.0),
            site("chr1", 20, 15.0),
            site("chr2", 30, 8.0),
            site("chr2", 40, 20.0),
        ]
        .concat();
        let file = create_test_file(&vcf_with(&body));
        let variants = VcfReader::new().read(file.path()).unwrap();

        let policy = SelectionPolicy::Vqslod { threshold: 10.0 };
        assert_eq!(policy.select(&variants), vec![1, 3]);

        let kept = policy.apply(&variants).unwrap();
        assert_eq!(kept.records()[0].pos, "20");
        assert_eq!(kept.records()[1].pos, "40");
        assert_eq!(kept.columns().ref_count, vec![20.0, 40.0]);
        assert_eq!(kept.columns().alt_count, vec![21.0, 41.0]);
        assert_eq!(kept.index().chromosomes(), &["chr1".to_string(), "chr2".to_string()]);
        assert_eq!(kept.index().positions(), &[vec![20], vec![40]]);
        assert_eq!(kept.index().chrom_starts(), &[0, 1]);
    }

    #[test]
    fn test_half_policy_skips_first_eleven_runs() {
        let loci: Vec<(String, u64)> = (0..13).map(|run| (format!("chr{:02}", run), 100)).collect();
        let index = ChromIndex::build(loci.iter().map(|(chrom, pos)| (chrom.as_str(), *pos)));
        let vqslod = vec![50.0; 13];

        assert_eq!(select_by_vqslod_half(&vqslod, &index, 10.0), vec![11, 12]);
        assert_eq!(select_by_vqslod(&vqslod, 10.0).len(), 13);
    }

    #[test]
    fn test_half_policy_applies_threshold_within_runs() {
        let mut loci: Vec<(String, u64)> = (0..11).map(|run| (format!("c{}", run), 1)).collect();
        loci.push(("c11".to_string(), 1));
        loci.push(("c11".to_string(), 2));
        loci.push(("c11".to_string(), 3));
        let index = ChromIndex::build(loci.iter().map(|(chrom, pos)| (chrom.as_str(), *pos)));

        let mut vqslod = vec![99.0; 11];
        vqslod.extend([12.0, 3.0, 11.0]);

        assert_eq!(select_by_vqslod_half(&vqslod, &index, 10.0), vec![11, 13]);
    }

    #[test]
    fn test_half_policy_with_few_runs_keeps_nothing() {
        let index = ChromIndex::build([("chr1", 1), ("chr2", 1)]);
        assert!(select_by_vqslod_half(&[100.0, 100.0], &index, 0.0).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_half_policy_short_vqslod_panics() {
        let loci: Vec<(String, u64)> = (0..12).map(|run| (format!("chr{:02}", run), 1)).collect();
        let index = ChromIndex::build(loci.iter().map(|(chrom, pos)| (chrom.as_str(), *pos)));
        select_by_vqslod_half(&[1.0; 11], &index, 0.0);
    }

    #[test]
    fn test_excluding_policy() {
        let body: String = [site("chr1", 10, 1.0), site("chr1", 20, 1.0), site("chr2", 30, 1.0)].concat();
        let vcf = create_test_file(&vcf_with(&body));
        let variants = VcfReader::new().read(vcf.path()).unwrap();

        let exclude = create_test_file("CHROM\tPOS\nchr1\t20\nchr3\t30\n");
        let excluded = TabularReader::new().read(exclude.path()).unwrap();

        let policy = SelectionPolicy::Excluding(excluded.index().clone());
        assert_eq!(policy.select(&variants), vec![0, 2]);
        assert_eq!(policy.apply(&variants).unwrap().n_loci(), 2);
    }

    #[test]
    fn test_policy_from_json() {
        let policy: SelectionPolicy =
            serde_json::from_str(r#"{"policy": "vqslod_half", "threshold": 8.0}"#).unwrap();
        assert_eq!(policy, SelectionPolicy::VqslodHalf { threshold: 8.0 });
        assert_eq!(policy.name(), "vqslod_half");
    }
}
