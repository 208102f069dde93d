use std::fmt::{self, Display};
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vcfgeno_core::{Result, VcfGenoError};

use crate::consts::{THRESHOLD_DELIMITER, THRESHOLD_NAMES};

///
/// On-disk shape of a thresholds file, before validation.
///
/// ```toml
/// individual_missing_max = 0.2
/// marker_missing_max = 0.3
/// heterozygosity_max = 0.4
/// maf_min = 0.05
/// ```
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Copy)]
pub struct ThresholdsConfig {
    pub individual_missing_max: f64,
    pub marker_missing_max: f64,
    pub heterozygosity_max: f64,
    pub maf_min: f64,
}

///
/// The four cascade thresholds, each validated to lie in `[0, 1]`.
///
/// Built once before the cascade starts; there are no setters.
///
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Copy)]
#[serde(try_from = "ThresholdsConfig", into = "ThresholdsConfig")]
pub struct FilterThresholds {
    individual_missing_max: f64,
    marker_missing_max: f64,
    heterozygosity_max: f64,
    maf_min: f64,
}

impl FilterThresholds {
    pub fn new(
        individual_missing_max: f64,
        marker_missing_max: f64,
        heterozygosity_max: f64,
        maf_min: f64,
    ) -> Result<Self> {
        let values = [
            individual_missing_max,
            marker_missing_max,
            heterozygosity_max,
            maf_min,
        ];
        for (name, value) in THRESHOLD_NAMES.iter().zip(values) {
            if !(0.0..=1.0).contains(&value) {
                return Err(VcfGenoError::ThresholdOutOfRange {
                    name: name.to_string(),
                    value,
                });
            }
        }

        Ok(FilterThresholds {
            individual_missing_max,
            marker_missing_max,
            heterozygosity_max,
            maf_min,
        })
    }

    ///
    /// Read thresholds from a TOML file.
    ///
    /// # Arguments
    /// - path: Path to the config file (a .toml) file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let toml_str = read_to_string(path)?;
        toml::from_str(&toml_str).map_err(|e| VcfGenoError::ThresholdParse(e.to_string()))
    }

    pub fn individual_missing_max(&self) -> f64 {
        self.individual_missing_max
    }

    pub fn marker_missing_max(&self) -> f64 {
        self.marker_missing_max
    }

    pub fn heterozygosity_max(&self) -> f64 {
        self.heterozygosity_max
    }

    pub fn maf_min(&self) -> f64 {
        self.maf_min
    }

    /// In input order: individual missing, marker missing, heterozygosity, MAF.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.individual_missing_max,
            self.marker_missing_max,
            self.heterozygosity_max,
            self.maf_min,
        ]
    }
}

impl TryFrom<ThresholdsConfig> for FilterThresholds {
    type Error = VcfGenoError;

    fn try_from(value: ThresholdsConfig) -> Result<Self> {
        FilterThresholds::new(
            value.individual_missing_max,
            value.marker_missing_max,
            value.heterozygosity_max,
            value.maf_min,
        )
    }
}

impl From<FilterThresholds> for ThresholdsConfig {
    fn from(value: FilterThresholds) -> Self {
        ThresholdsConfig {
            individual_missing_max: value.individual_missing_max,
            marker_missing_max: value.marker_missing_max,
            heterozygosity_max: value.heterozygosity_max,
            maf_min: value.maf_min,
        }
    }
}

impl TryFrom<[f64; 4]> for FilterThresholds {
    type Error = VcfGenoError;

    fn try_from(value: [f64; 4]) -> Result<Self> {
        FilterThresholds::new(value[0], value[1], value[2], value[3])
    }
}

impl FromStr for FilterThresholds {
    type Err = VcfGenoError;

    /// Parses `"<individual missing>,<marker missing>,<heterozygosity>,<maf>"`.
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(THRESHOLD_DELIMITER)
            .map(|v| {
                v.trim().parse::<f64>().map_err(|_| {
                    VcfGenoError::ThresholdParse(format!("'{}' is not a number", v.trim()))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let values: [f64; 4] = values.try_into().map_err(|v: Vec<f64>| {
            VcfGenoError::ThresholdParse(format!(
                "expected 4 comma-separated values, found {}",
                v.len()
            ))
        })?;

        FilterThresholds::try_from(values)
    }
}

impl Display for FilterThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Missing individual filter: {}", self.individual_missing_max)?;
        writeln!(f, "Missing marker filter: {}", self.marker_missing_max)?;
        writeln!(f, "Maximum Heterozygosity filter: {}", self.heterozygosity_max)?;
        writeln!(f, "Minimum Minor Allele Frequency: {}", self.maf_min)
    }
}
