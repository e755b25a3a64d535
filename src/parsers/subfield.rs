// ==============================================================================
// parsers/subfield.rs - INFO / FORMAT Mini-grammar Extraction
// ==============================================================================
// Description: Typed extraction from key=value INFO lists and colon-delimited
//              FORMAT/sample columns, plus the scalar conversions shared by
//              both readers
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================
// Grammar:
//   INFO    := entry (';' entry)*        entry := KEY ['=' VALUE]
//   FORMAT  := TAG (':' TAG)*
//   SAMPLE  := VALUE (':' VALUE)*         AD := COUNT ',' COUNT
//   COUNT   := '.' | unsigned integer
// ==============================================================================

use std::path::Path;

use crate::error::{AlleleDepthError, IngestError, Result};
use crate::parsers::tokenizer::{tokenize, INFO, SAMPLE};

/// INFO key carrying the variant quality score
pub const VQSLOD_KEY: &str = "VQSLOD";

/// INFO key carrying the population allele frequency
pub const AF_KEY: &str = "AF";

/// FORMAT tag carrying allele depths
pub const AD_TAG: &str = "AD";

/// Values extracted from one INFO column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfoValues {
    pub vqslod: f64,
    pub plaf: Option<f64>,
}

/// Scan an INFO column for VQSLOD and, if requested, AF
///
/// Entries without `=` are flags and are ignored. When a key repeats the
/// last occurrence wins.
pub fn extract_info(info: &str, extract_plaf: bool) -> Result<InfoValues> {
    let mut vqslod = None;
    let mut plaf = None;

    for entry in tokenize(info, INFO) {
        let Some((key, value)) = entry.split_once('=') else {
            continue;
        };

        if key == VQSLOD_KEY {
            vqslod = Some(parse_info_float(key, value)?);
        } else if key == AF_KEY && extract_plaf {
            plaf = Some(parse_info_float(key, value)?);
        }
    }

    let vqslod = vqslod.ok_or_else(|| IngestError::VcfVQSLODNotFound {
        info: info.to_string(),
    })?;

    Ok(InfoValues { vqslod, plaf })
}

fn parse_info_float(key: &str, value: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| IngestError::VcfBadInfoValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Zero-based position of the AD tag within a FORMAT column
pub fn allele_depth_position(format: &str) -> Result<usize> {
    tokenize(format, SAMPLE)
        .iter()
        .position(|&tag| tag == AD_TAG)
        .ok_or_else(|| IngestError::VcfCoverageFieldNotFound {
            format: format.to_string(),
        })
}

/// Read the `(ref, alt)` allele depths at `ad_position` of a sample column
pub fn extract_allele_depths(sample: &str, ad_position: usize) -> Result<(u32, u32)> {
    let sub_fields = tokenize(sample, SAMPLE);
    let Some(ad) = sub_fields.get(ad_position) else {
        return Err(IngestError::VcfBadAlleleDepth {
            value: sample.to_string(),
            source: AlleleDepthError::Missing(ad_position),
        });
    };

    parse_allele_depth(ad).map_err(|source| IngestError::VcfBadAlleleDepth {
        value: ad.to_string(),
        source,
    })
}

/// Parse an AD value of exactly two comma-separated counts
///
/// A literal `.` counts as zero.
///
/// # Example
/// ```
/// use variant_ingest::parsers::subfield::parse_allele_depth;
///
/// assert_eq!(parse_allele_depth("7,3").unwrap(), (7, 3));
/// assert_eq!(parse_allele_depth(".,5").unwrap(), (0, 5));
/// assert!(parse_allele_depth("1,2,3").is_err());
/// ```
pub fn parse_allele_depth(ad: &str) -> std::result::Result<(u32, u32), AlleleDepthError> {
    let counts: Vec<&str> = ad.split(',').collect();
    if counts.len() != 2 {
        return Err(AlleleDepthError::WrongCount(counts.len()));
    }

    Ok((dot_or_count(counts[0])?, dot_or_count(counts[1])?))
}

fn dot_or_count(value: &str) -> std::result::Result<u32, AlleleDepthError> {
    if value == "." {
        return Ok(0);
    }

    value
        .trim()
        .parse::<u32>()
        .map_err(|source| AlleleDepthError::BadCount {
            value: value.to_string(),
            source,
        })
}

/// Parse a POS field
///
/// Scientific notation (`1e3`) is rejected before the integer parse so the
/// two failure modes stay distinguishable.
pub fn parse_position(value: &str, path: &Path) -> Result<u64> {
    if value.contains(['e', 'E']) {
        return Err(IngestError::BadScientificNotation {
            value: value.to_string(),
            path: path.to_path_buf(),
        });
    }

    value
        .trim()
        .parse::<u64>()
        .map_err(|_| IngestError::BadConversion {
            value: value.to_string(),
            path: path.to_path_buf(),
        })
}

/// Lenient base-10 float conversion for tabular value columns
///
/// Parses the longest numeric prefix after leading whitespace; a field with
/// no numeric prefix converts to 0.0 instead of failing.
pub fn lenient_float(value: &str) -> f64 {
    let value = value.trim_start();
    if let Ok(parsed) = value.parse::<f64>() {
        return parsed;
    }

    value
        .char_indices()
        .map(|(i, _)| i)
        .rev()
        .find_map(|end| value[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_with_plaf() {
        let values = extract_info("DP=31;VQSLOD=10.5;AF=0.3", true).unwrap();
        assert_eq!(values.vqslod, 10.5);
        assert_eq!(values.plaf, Some(0.3));
    }

    #[test]
    fn test_info_plaf_not_requested() {
        let values = extract_info("VQSLOD=10.5;AF=0.3", false).unwrap();
        assert_eq!(values.vqslod, 10.5);
        assert_eq!(values.plaf, None);
    }

    #[test]
    fn test_info_missing_vqslod() {
        match extract_info("DP=31;AF=0.3;DB", true) {
            Err(IngestError::VcfVQSLODNotFound { info }) => assert_eq!(info, "DP=31;AF=0.3;DB"),
            other => panic!("Expected VcfVQSLODNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_info_key_must_match_exactly() {
        // "VQSLOD_X" and "MAF" are different keys
        let err = extract_info("VQSLOD_X=1.0;MAF=0.2", true).unwrap_err();
        assert!(matches!(err, IngestError::VcfVQSLODNotFound { .. }));

        let values = extract_info("VQSLOD=-2.5;MAF=0.2", true).unwrap();
        assert_eq!(values.vqslod, -2.5);
        assert_eq!(values.plaf, None);
    }

    #[test]
    fn test_info_bad_value() {
        let err = extract_info("VQSLOD=high", false).unwrap_err();
        assert!(matches!(err, IngestError::VcfBadInfoValue { ref key, .. } if key == "VQSLOD"));
    }

    #[test]
    fn test_allele_depth_position() {
        assert_eq!(allele_depth_position("GT:AD:DP:GQ:PL").unwrap(), 1);
        assert_eq!(allele_depth_position("AD").unwrap(), 0);

        let err = allele_depth_position("GT:DP:GQ").unwrap_err();
        assert!(matches!(err, IngestError::VcfCoverageFieldNotFound { ref format } if format == "GT:DP:GQ"));
    }

    #[test]
    fn test_allele_depths() {
        assert_eq!(extract_allele_depths("0/1:7,3:10", 1).unwrap(), (7, 3));
        assert_eq!(extract_allele_depths("0/1:.,5:10", 1).unwrap(), (0, 5));
        assert_eq!(extract_allele_depths("0/1:.,.:10", 1).unwrap(), (0, 0));
    }

    #[test]
    fn test_allele_depths_wrong_count() {
        match extract_allele_depths("0/1:1,2,3", 1) {
            Err(IngestError::VcfBadAlleleDepth { value, source }) => {
                assert_eq!(value, "1,2,3");
                assert_eq!(source, AlleleDepthError::WrongCount(3));
            }
            other => panic!("Expected VcfBadAlleleDepth, got {:?}", other),
        }
    }

    #[test]
    fn test_allele_depths_cause_is_chained() {
        use std::error::Error;

        let err = extract_allele_depths("0/1:x,4", 1).unwrap_err();
        let cause = err.source().expect("AD errors carry their cause");
        assert!(cause.to_string().contains("'x'"));
    }

    #[test]
    fn test_allele_depths_missing_sub_field() {
        let err = extract_allele_depths("0/1", 1).unwrap_err();
        assert!(matches!(
            err,
            IngestError::VcfBadAlleleDepth { source: AlleleDepthError::Missing(1), .. }
        ));
    }

    #[test]
    fn test_position_parsing() {
        let path = Path::new("sites.txt");
        assert_eq!(parse_position("12345", path).unwrap(), 12345);

        assert!(matches!(
            parse_position("1e3", path),
            Err(IngestError::BadScientificNotation { .. })
        ));
        assert!(matches!(
            parse_position("1E3", path),
            Err(IngestError::BadScientificNotation { .. })
        ));
        assert!(matches!(
            parse_position("abc", path),
            Err(IngestError::BadConversion { .. })
        ));
        assert!(matches!(
            parse_position("-5", path),
            Err(IngestError::BadConversion { .. })
        ));
    }

    #[test]
    fn test_lenient_float() {
        assert_eq!(lenient_float("0.25"), 0.25);
        assert_eq!(lenient_float("  12"), 12.0);
        assert_eq!(lenient_float("1.5abc"), 1.5);
        assert_eq!(lenient_float("abc"), 0.0);
        assert_eq!(lenient_float(""), 0.0);
        assert_eq!(lenient_float("-3e-2"), -0.03);
    }
}
