pub mod axis;
pub mod encoded;
pub mod frequency;
pub mod genotype;
pub mod marker;
pub mod matrix;

// re-export for cleaner imports
pub use self::axis::Axis;
pub use self::encoded::{EncodedGenotypeTable, EncodedMarker};
pub use self::frequency::{AxisFrequencyMap, FrequencyDistribution, Summaries};
pub use self::genotype::{GenotypeCode, normalize_genotype};
pub use self::marker::MarkerRecord;
pub use self::matrix::GenotypeMatrix;
