use std::fmt::{self, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::{GT_FIELD_DELIMITER, MISSING_SYMBOL};
use crate::errors::{Result, VcfGenoError};

///
/// Continuous genotype code for a diploid, bi-allelic, unphased call.
///
/// The numeric codes count alternate alleles: `0` homozygous reference,
/// `1` heterozygous (either arrangement), `2` homozygous alternate.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GenotypeCode {
    HomRef,
    Het,
    HomAlt,
    Missing,
}

impl GenotypeCode {
    /// Every code, in the order used to index count tables.
    pub const ALL: [GenotypeCode; 4] = [
        GenotypeCode::HomRef,
        GenotypeCode::Het,
        GenotypeCode::HomAlt,
        GenotypeCode::Missing,
    ];

    pub fn index(&self) -> usize {
        match self {
            GenotypeCode::HomRef => 0,
            GenotypeCode::Het => 1,
            GenotypeCode::HomAlt => 2,
            GenotypeCode::Missing => 3,
        }
    }

    ///
    /// Symbol written to the encoded output table.
    ///
    pub fn symbol(&self) -> &'static str {
        match self {
            GenotypeCode::HomRef => "0",
            GenotypeCode::Het => "1",
            GenotypeCode::HomAlt => "2",
            GenotypeCode::Missing => MISSING_SYMBOL,
        }
    }
}

impl Display for GenotypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for GenotypeCode {
    type Err = VcfGenoError;

    /// Parses a raw VCF sample field, e.g. `0/1:12,3:15`.
    fn from_str(s: &str) -> Result<Self> {
        normalize_genotype(s)
    }
}

///
/// Map a raw VCF sample field onto its continuous genotype code.
///
/// Only the leading `GT` token (everything before the first `:`) is looked at.
/// Anything other than the four unphased diploid calls and the missing pair is an
/// error; phased calls, haploid calls and half-missing calls are not coerced.
///
/// # Arguments
/// - raw: the sample field, as found in the VCF.
///
pub fn normalize_genotype(raw: &str) -> Result<GenotypeCode> {
    let gt = raw.split(GT_FIELD_DELIMITER).next().unwrap_or(raw);

    match gt {
        "0/0" => Ok(GenotypeCode::HomRef),
        "0/1" | "1/0" => Ok(GenotypeCode::Het),
        "1/1" => Ok(GenotypeCode::HomAlt),
        "./." => Ok(GenotypeCode::Missing),
        _ => Err(VcfGenoError::UnrecognizedGenotype {
            token: gt.to_string(),
        }),
    }
}
