use thiserror::Error;

use crate::models::Axis;

#[derive(Error, Debug)]
pub enum VcfGenoError {
    #[error("Unrecognized genotype '{token}' (expected one of 0/0, 0/1, 1/0, 1/1, ./.)")]
    UnrecognizedGenotype { token: String },

    #[error("Unrecognized genotype '{token}' for individual {individual} at marker {marker}")]
    UnrecognizedGenotypeAt {
        token: String,
        marker: String,
        individual: String,
    },

    #[error("Malformed VCF at line {line}: {reason}")]
    MalformedVcf { line: usize, reason: String },

    #[error("No VCF header line (#CHROM ...) found")]
    MissingHeader,

    #[error("Stage '{stage}' evaluated zero {axis}; removal percentage is undefined")]
    EmptyEvaluation { stage: String, axis: Axis },

    #[error("Threshold {name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: String, value: f64 },

    #[error("Can't parse thresholds: {0}")]
    ThresholdParse(String),

    #[error(
        "Frequency map over {axis} was computed at generation {map_generation} but the matrix is at generation {matrix_generation}"
    )]
    StaleFrequencyMap {
        axis: Axis,
        map_generation: u64,
        matrix_generation: u64,
    },

    #[error("Unknown {axis} identifier: {id}")]
    UnknownEntity { axis: Axis, id: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VcfGenoError>;
