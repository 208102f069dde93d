use std::fmt::{self, Display};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use vcfgeno_core::Result;
use vcfgeno_core::models::Axis;

use crate::config::FilterThresholds;
use crate::stages::StageKind;

///
/// What one filter stage did to the matrix.
///
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StageReport {
    pub stage: String,
    pub kind: StageKind,
    pub axis: Axis,
    pub threshold: f64,
    pub evaluated: usize,
    pub removed: usize,
    /// `removed / evaluated * 100`; `evaluated` is the size of the map the stage ran on.
    pub removed_percent: f64,
    /// Removed entities and the frequency that failed them.
    pub failed: Vec<(String, f64)>,
    /// Entities with no recorded missing frequency (missing-data stages only).
    pub unrecorded: Vec<String>,
    pub shape_before: (usize, usize),
    pub shape_after: (usize, usize),
}

impl StageReport {
    pub fn removed_ids(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(|(id, _)| id.as_str())
    }

    ///
    /// Write this stage's section of the run log.
    ///
    /// Missing-data stages list every failing entity with its missing frequency and
    /// every entity that had no missing calls at all.
    ///
    pub fn write_log<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "Stage {}: {}", self.stage, self.describe())?;

        if self.kind.is_missing_data() {
            writeln!(w, "Failed {}", self.axis)?;
            for (id, freq) in &self.failed {
                writeln!(w, "{}\t{}", id, freq)?;
            }
            for id in &self.unrecorded {
                writeln!(w, "No missing {} data found for {}", self.axis, id)?;
            }
        }

        writeln!(
            w,
            "\nFailed {} Percent: {:.2} of {} {}",
            self.stage, self.removed_percent, self.evaluated, self.axis
        )?;
        writeln!(
            w,
            "Shape (markers, individuals): {:?} -> {:?}\n",
            self.shape_before, self.shape_after
        )?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "remove {} with {} {}",
            self.axis,
            self.kind.statistic(),
            self.kind.comparison_with(self.threshold)
        )
    }
}

impl Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: removed {} of {} {} ({:.2}%)",
            self.stage, self.removed, self.evaluated, self.axis, self.removed_percent
        )
    }
}

///
/// Everything the cascade did, in stage order.
///
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CascadeReport {
    pub thresholds: FilterThresholds,
    pub shape_before: (usize, usize),
    pub shape_after: (usize, usize),
    pub stages: Vec<StageReport>,
}

impl CascadeReport {
    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == name)
    }

    ///
    /// Write the full run log: the thresholds, then one section per stage.
    ///
    pub fn write_log<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        writeln!(w, "{}", self.thresholds)?;
        for stage in &self.stages {
            stage.write_log(w)?;
        }
        writeln!(
            w,
            "Final shape (markers, individuals): {:?} -> {:?}",
            self.shape_before, self.shape_after
        )?;
        w.flush()
    }

    pub fn to_log_file<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_log(&mut writer)?;
        Ok(())
    }
}
