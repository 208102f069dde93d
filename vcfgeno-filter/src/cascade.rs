use log::info;

use vcfgeno_core::models::{Axis, EncodedGenotypeTable, GenotypeMatrix};
use vcfgeno_core::{GenotypeFrequencies, Result};

use crate::config::FilterThresholds;
use crate::consts::INITIAL_INDIVIDUAL_MISSING_CEILING;
use crate::report::{CascadeReport, StageReport};
use crate::stages::{FilterStage, HeterozygosityFilter, MissingDataFilter, RareAlleleFilter};

///
/// The fixed filter cascade.
///
/// individual missing (fixed 0.5 ceiling) -> marker missing -> heterozygosity ->
/// rare allele -> individual missing (caller's threshold) -> finalize.
///
/// Both axes are re-summarized after every stage and the matrix is finally consumed
/// into its continuous encoding.
///
pub struct Cascade {
    thresholds: FilterThresholds,
}

impl Cascade {
    pub fn new(thresholds: FilterThresholds) -> Self {
        Cascade { thresholds }
    }

    ///
    /// The stages, in the order they run.
    ///
    pub fn stages(&self) -> Vec<Box<dyn FilterStage>> {
        vec![
            Box::new(MissingDataFilter::new(
                "initial-individual-missing",
                Axis::Individuals,
                INITIAL_INDIVIDUAL_MISSING_CEILING,
            )),
            Box::new(MissingDataFilter::markers(self.thresholds.marker_missing_max())),
            Box::new(HeterozygosityFilter::new(self.thresholds.heterozygosity_max())),
            Box::new(RareAlleleFilter::new(self.thresholds.maf_min())),
            Box::new(MissingDataFilter::individuals(
                self.thresholds.individual_missing_max(),
            )),
        ]
    }

    pub fn run(&self, matrix: GenotypeMatrix) -> Result<(EncodedGenotypeTable, CascadeReport)> {
        self.run_with(matrix, |_| {})
    }

    ///
    /// Run every stage, then finalize.
    ///
    /// # Arguments
    /// - matrix: the loaded matrix; it is consumed
    /// - on_stage: called after each stage with that stage's report
    ///
    pub fn run_with<F>(
        &self,
        mut matrix: GenotypeMatrix,
        mut on_stage: F,
    ) -> Result<(EncodedGenotypeTable, CascadeReport)>
    where
        F: FnMut(&StageReport),
    {
        let shape_before = matrix.shape();
        info!(
            "Filtering {} markers x {} individuals",
            shape_before.0, shape_before.1
        );

        let mut summaries = matrix.summarize_both()?;
        let mut reports: Vec<StageReport> = Vec::new();

        for stage in self.stages() {
            let (report, fresh) = stage.apply(&mut matrix, summaries)?;
            summaries = fresh;
            on_stage(&report);
            reports.push(report);
        }

        let table = matrix.into_encoded()?;
        let shape_after = table.shape();
        info!(
            "Kept {} markers x {} individuals",
            shape_after.0, shape_after.1
        );

        Ok((
            table,
            CascadeReport {
                thresholds: self.thresholds,
                shape_before,
                shape_after,
                stages: reports,
            },
        ))
    }
}
