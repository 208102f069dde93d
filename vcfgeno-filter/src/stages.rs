//! Filter stages.
//!
//! Every stage evaluates one frequency predicate per entity of a single axis, drops the
//! failing rows or columns from the matrix and hands back fresh summaries of both
//! axes. Comparisons are strict: an entity sitting exactly on its threshold stays.

use log::{debug, info, warn};
use serde::Serialize;

use vcfgeno_core::models::{
    Axis, AxisFrequencyMap, FrequencyDistribution, GenotypeCode, GenotypeMatrix, Summaries,
};
use vcfgeno_core::{GenotypeFrequencies, Result, VcfGenoError};

use crate::report::StageReport;

/// The four filter variants.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    MissingIndividuals,
    MissingMarkers,
    Heterozygosity,
    RareAllele,
}

impl StageKind {
    pub fn is_missing_data(&self) -> bool {
        matches!(self, StageKind::MissingIndividuals | StageKind::MissingMarkers)
    }

    pub fn statistic(&self) -> &'static str {
        match self {
            StageKind::MissingIndividuals | StageKind::MissingMarkers => "missing frequency",
            StageKind::Heterozygosity => "heterozygous frequency",
            StageKind::RareAllele => "minor allele frequency",
        }
    }

    pub fn comparison_with(&self, threshold: f64) -> String {
        match self {
            StageKind::RareAllele => format!("< {}", threshold),
            _ => format!("> {}", threshold),
        }
    }
}

/// Outcome of evaluating one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Keep,
    /// Remove, carrying the statistic that failed the entity.
    Remove(f64),
    /// Kept because the statistic was never observed for this entity.
    Unrecorded,
}

pub trait FilterStage {
    /// Label used in logs and reports.
    fn name(&self) -> &str;

    fn kind(&self) -> StageKind;

    fn axis(&self) -> Axis;

    fn threshold(&self) -> f64;

    fn evaluate(&self, dist: &FrequencyDistribution) -> Verdict;

    ///
    /// Evaluate every entity of `freqs` and drop the failing ones from `matrix`.
    ///
    /// `freqs` must be a map over this stage's axis computed from the matrix's current
    /// generation; anything else is rejected before the matrix is touched.
    ///
    fn prune(&self, matrix: &mut GenotypeMatrix, freqs: AxisFrequencyMap) -> Result<StageReport> {
        if freqs.generation() != matrix.generation() || freqs.axis() != self.axis() {
            return Err(VcfGenoError::StaleFrequencyMap {
                axis: freqs.axis(),
                map_generation: freqs.generation(),
                matrix_generation: matrix.generation(),
            });
        }

        let evaluated = freqs.len();
        if evaluated == 0 {
            return Err(VcfGenoError::EmptyEvaluation {
                stage: self.name().to_string(),
                axis: self.axis(),
            });
        }

        let shape_before = matrix.shape();
        debug!("{} pre-filter shape: {:?}", self.name(), shape_before);

        let mut failed: Vec<(String, f64)> = Vec::new();
        let mut unrecorded: Vec<String> = Vec::new();

        for (id, dist) in freqs.iter() {
            match self.evaluate(dist) {
                Verdict::Keep => {}
                Verdict::Remove(value) => failed.push((id.to_string(), value)),
                Verdict::Unrecorded => unrecorded.push(id.to_string()),
            }
        }

        let doomed: Vec<String> = failed.iter().map(|(id, _)| id.clone()).collect();
        let removed = matrix.remove(self.axis(), &doomed)?;
        let removed_percent = removed as f64 / evaluated as f64 * 100.0;

        let shape_after = matrix.shape();
        debug!("{} post-filter shape: {:?}", self.name(), shape_after);

        info!(
            "{}: removed {} of {} {} ({:.2}%) with {} {}",
            self.name(),
            removed,
            evaluated,
            self.axis(),
            removed_percent,
            self.kind().statistic(),
            self.kind().comparison_with(self.threshold())
        );
        if removed == evaluated {
            warn!("{} removed every one of the {} {}", self.name(), evaluated, self.axis());
        }

        Ok(StageReport {
            stage: self.name().to_string(),
            kind: self.kind(),
            axis: self.axis(),
            threshold: self.threshold(),
            evaluated,
            removed,
            removed_percent,
            failed,
            unrecorded,
            shape_before,
            shape_after,
        })
    }

    ///
    /// [FilterStage::prune] followed by a fresh summary of both axes.
    ///
    fn apply(
        &self,
        matrix: &mut GenotypeMatrix,
        summaries: Summaries,
    ) -> Result<(StageReport, Summaries)> {
        let report = self.prune(matrix, summaries.into_axis(self.axis()))?;
        let summaries = matrix.summarize_both()?;

        Ok((report, summaries))
    }
}

///
/// Removes individuals or markers whose missing-call frequency exceeds the threshold.
///
pub struct MissingDataFilter {
    name: String,
    axis: Axis,
    threshold: f64,
}

impl MissingDataFilter {
    pub fn new(name: &str, axis: Axis, threshold: f64) -> Self {
        MissingDataFilter {
            name: name.to_string(),
            axis,
            threshold,
        }
    }

    pub fn individuals(threshold: f64) -> Self {
        Self::new("individual-missing", Axis::Individuals, threshold)
    }

    pub fn markers(threshold: f64) -> Self {
        Self::new("marker-missing", Axis::Markers, threshold)
    }
}

impl FilterStage for MissingDataFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StageKind {
        match self.axis {
            Axis::Individuals => StageKind::MissingIndividuals,
            Axis::Markers => StageKind::MissingMarkers,
        }
    }

    fn axis(&self) -> Axis {
        self.axis
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn evaluate(&self, dist: &FrequencyDistribution) -> Verdict {
        match dist.observed(GenotypeCode::Missing) {
            Some(missing) if missing > self.threshold => Verdict::Remove(missing),
            Some(_) => Verdict::Keep,
            None => Verdict::Unrecorded,
        }
    }
}

///
/// Removes markers whose heterozygous-call frequency exceeds the threshold.
///
pub struct HeterozygosityFilter {
    threshold: f64,
}

impl HeterozygosityFilter {
    pub fn new(threshold: f64) -> Self {
        HeterozygosityFilter { threshold }
    }
}

impl FilterStage for HeterozygosityFilter {
    fn name(&self) -> &str {
        "heterozygosity"
    }

    fn kind(&self) -> StageKind {
        StageKind::Heterozygosity
    }

    fn axis(&self) -> Axis {
        Axis::Markers
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn evaluate(&self, dist: &FrequencyDistribution) -> Verdict {
        let het = dist.frequency(GenotypeCode::Het);
        if het > self.threshold {
            Verdict::Remove(het)
        } else {
            Verdict::Keep
        }
    }
}

///
/// Removes markers whose minor allele frequency falls below the threshold.
///
/// Under the continuous encoding both `1` and `2` carry an alternate allele, so the
/// frequency used is `f(1) + f(2)`; a code that was never observed contributes zero.
///
pub struct RareAlleleFilter {
    threshold: f64,
}

impl RareAlleleFilter {
    pub fn new(threshold: f64) -> Self {
        RareAlleleFilter { threshold }
    }
}

pub fn minor_allele_frequency(dist: &FrequencyDistribution) -> f64 {
    dist.frequency(GenotypeCode::Het) + dist.frequency(GenotypeCode::HomAlt)
}

impl FilterStage for RareAlleleFilter {
    fn name(&self) -> &str {
        "rare-allele"
    }

    fn kind(&self) -> StageKind {
        StageKind::RareAllele
    }

    fn axis(&self) -> Axis {
        Axis::Markers
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn evaluate(&self, dist: &FrequencyDistribution) -> Verdict {
        let maf = minor_allele_frequency(dist);
        if maf < self.threshold {
            Verdict::Remove(maf)
        } else {
            Verdict::Keep
        }
    }
}
