//! # vcfgeno-filter
//!
//! The filter cascade: ordered missing-data, heterozygosity and minor allele
//! frequency filters over a [GenotypeMatrix](vcfgeno_core::models::GenotypeMatrix),
//! re-summarizing genotype frequencies after every prune.
//!
//! ```no_run
//! use vcfgeno_core::models::GenotypeMatrix;
//! use vcfgeno_filter::{Cascade, FilterThresholds};
//!
//! let matrix = GenotypeMatrix::try_from("panel.vcf.gz").unwrap();
//! let thresholds: FilterThresholds = "0.2,0.3,0.4,0.05".parse().unwrap();
//!
//! let (table, report) = Cascade::new(thresholds).run(matrix).unwrap();
//! table.to_csv("panel.csv").unwrap();
//! ```

pub mod cascade;
pub mod config;
pub mod consts;
pub mod report;
pub mod stages;

// re-exports
pub use cascade::*;
pub use config::*;
pub use report::*;
pub use stages::*;
