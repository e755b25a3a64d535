// ==============================================================================
// config.rs - Load Configuration
// ==============================================================================
// Description: Settings for one VCF load, readable from a JSON file and
//              overridable from the command line
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 0.1.0
// ==============================================================================
// Example:
//   {
//     "sample": "PG0390-C",
//     "extract_plaf": true,
//     "selection": { "policy": "vqslod", "threshold": 8.0 },
//     "exclude": "exclude.txt"
//   }
// ==============================================================================

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::filter::SelectionPolicy;
use crate::models::MarkerSet;
use crate::parsers::{TabularReader, VcfReader};

/// Settings for loading and filtering one VCF
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Sample to load; None selects the first sample column
    pub sample: Option<String>,

    /// Extract INFO/AF as the population allele frequency
    pub extract_plaf: bool,

    /// VQSLOD selection applied after loading
    pub selection: Option<SelectionPolicy>,

    /// CHROM/POS list of sites to drop after loading
    pub exclude: Option<PathBuf>,
}

impl LoadConfig {
    /// Read a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Reader configured with this sample / AF choice
    pub fn vcf_reader(&self) -> VcfReader {
        let reader = VcfReader::new().with_plaf(self.extract_plaf);
        match &self.sample {
            Some(sample) => reader.with_sample(sample.clone()),
            None => reader,
        }
    }

    /// Policies to apply in order: exclusion first, then VQSLOD selection
    pub fn policies(&self) -> Result<Vec<SelectionPolicy>> {
        let mut policies = Vec::new();

        if let Some(exclude) = &self.exclude {
            let excluded = TabularReader::new()
                .read(exclude)
                .with_context(|| format!("Failed to load exclusion list {}", exclude.display()))?;
            info!("Excluding {} listed sites", excluded.n_loci());
            policies.push(SelectionPolicy::Excluding(excluded.index().clone()));
        }

        if let Some(selection) = &self.selection {
            policies.push(selection.clone());
        }

        Ok(policies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::test_support::create_test_file;

    #[test]
    fn test_defaults() {
        let config: LoadConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LoadConfig::default());
        assert!(config.vcf_reader().sample.is_none());
        assert!(config.policies().unwrap().is_empty());
    }

    #[test]
    fn test_from_json_file() {
        let file = create_test_file(
            r#"{"sample": "PG0390-C", "extract_plaf": true,
                "selection": {"policy": "vqslod", "threshold": 8.0}}"#,
        );
        let config = LoadConfig::from_json_file(file.path()).unwrap();

        let reader = config.vcf_reader();
        assert_eq!(reader.sample.as_deref(), Some("PG0390-C"));
        assert!(reader.extract_plaf);
        assert_eq!(
            config.policies().unwrap(),
            vec![SelectionPolicy::Vqslod { threshold: 8.0 }]
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let file = create_test_file(r#"{"sampel": "PG0390-C"}"#);
        assert!(LoadConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_exclusion_list_loaded_first() {
        let exclude = create_test_file("CHROM\tPOS\nchr1\t20\n");
        let config = LoadConfig {
            exclude: Some(exclude.path().to_path_buf()),
            selection: Some(SelectionPolicy::VqslodHalf { threshold: 1.0 }),
            ..LoadConfig::default()
        };

        let policies = config.policies().unwrap();
        assert_eq!(policies.len(), 2);
        assert!(matches!(&policies[0], SelectionPolicy::Excluding(index) if index.contains("chr1", 20)));
        assert_eq!(policies[1], SelectionPolicy::VqslodHalf { threshold: 1.0 });
    }
}
