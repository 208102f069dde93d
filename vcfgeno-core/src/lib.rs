//! Core data model for vcfgeno.
//!
//! A [`GenotypeMatrix`](models::GenotypeMatrix) is loaded from VCF text, summarized into
//! per-axis genotype frequencies with [`GenotypeFrequencies`](statistics::GenotypeFrequencies),
//! and finally consumed into an [`EncodedGenotypeTable`](models::EncodedGenotypeTable)
//! holding continuous `0/1/2/.` codes.

pub mod consts;
pub mod errors;
pub mod models;
pub mod statistics;
pub mod utils;

// re-exports
pub use errors::{Result, VcfGenoError};
pub use statistics::GenotypeFrequencies;
