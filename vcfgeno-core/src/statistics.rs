//! Genotype frequency summaries over a [GenotypeMatrix].
//!
//! Summaries are always computed from the matrix as it is *now*; every map is stamped
//! with the matrix generation so a map computed before a prune can be told apart from
//! one computed after it.

use crate::errors::{Result, VcfGenoError};
use crate::models::matrix::leading_token;
use crate::models::{
    Axis, AxisFrequencyMap, FrequencyDistribution, GenotypeCode, GenotypeMatrix, Summaries,
};

/// Trait for computing genotype-code distributions along either axis of a matrix.
pub trait GenotypeFrequencies {
    /// Distribution of genotype codes for every entity on `axis`.
    ///
    /// For [Axis::Individuals] each column is summarized across all markers; for
    /// [Axis::Markers] each row is summarized across all individuals. Fails on the
    /// first genotype that does not normalize, naming the marker and individual.
    fn summarize(&self, axis: Axis) -> Result<AxisFrequencyMap>;

    /// Both axes at once.
    fn summarize_both(&self) -> Result<Summaries> {
        Ok(Summaries {
            individuals: self.summarize(Axis::Individuals)?,
            markers: self.summarize(Axis::Markers)?,
        })
    }
}

impl GenotypeFrequencies for GenotypeMatrix {
    fn summarize(&self, axis: Axis) -> Result<AxisFrequencyMap> {
        let individuals = self.individuals();
        let mut per_individual = vec![FrequencyDistribution::new(); individuals.len()];
        let mut per_marker: Vec<(String, FrequencyDistribution)> =
            Vec::with_capacity(self.n_markers());

        // single pass over the cells, accumulating whichever axis was asked for
        for marker in self.markers() {
            let mut row = FrequencyDistribution::new();

            for (col, raw) in marker.genotypes().iter().enumerate() {
                let code: GenotypeCode =
                    raw.parse()
                        .map_err(|_| VcfGenoError::UnrecognizedGenotypeAt {
                            token: leading_token(raw),
                            marker: marker.id.clone(),
                            individual: individuals[col].clone(),
                        })?;

                match axis {
                    Axis::Individuals => per_individual[col].add(code),
                    Axis::Markers => row.add(code),
                }
            }

            if axis == Axis::Markers {
                per_marker.push((marker.id.clone(), row));
            }
        }

        let entries = match axis {
            Axis::Individuals => individuals.iter().cloned().zip(per_individual).collect(),
            Axis::Markers => per_marker,
        };

        Ok(AxisFrequencyMap::new(axis, self.generation(), entries))
    }
}
