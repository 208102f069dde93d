use fxhash::FxHashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::models::{Axis, GenotypeCode};

///
/// Genotype-code distribution of one row or column.
///
/// Exact counts are stored; frequencies are derived on lookup, so the observed
/// frequencies of a non-empty distribution always sum to one. A code that was never
/// observed reads as zero frequency.
///
#[derive(Eq, PartialEq, Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrequencyDistribution {
    counts: [usize; 4],
    total: usize,
}

impl FrequencyDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, code: GenotypeCode) {
        self.counts[code.index()] += 1;
        self.total += 1;
    }

    pub fn count(&self, code: GenotypeCode) -> usize {
        self.counts[code.index()]
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    ///
    /// Frequency of `code`, or `None` if it was never observed.
    ///
    pub fn observed(&self, code: GenotypeCode) -> Option<f64> {
        match self.count(code) {
            0 => None,
            n => Some(n as f64 / self.total as f64),
        }
    }

    ///
    /// Frequency of `code`; codes that were never observed read as `0.0`.
    ///
    pub fn frequency(&self, code: GenotypeCode) -> f64 {
        self.observed(code).unwrap_or(0.0)
    }

    /// (code, frequency) for every observed code.
    pub fn iter(&self) -> impl Iterator<Item = (GenotypeCode, f64)> + '_ {
        GenotypeCode::ALL
            .iter()
            .filter_map(|code| self.observed(*code).map(|f| (*code, f)))
    }
}

impl FromIterator<GenotypeCode> for FrequencyDistribution {
    fn from_iter<I: IntoIterator<Item = GenotypeCode>>(iter: I) -> Self {
        let mut dist = FrequencyDistribution::new();
        for code in iter {
            dist.add(code);
        }
        dist
    }
}

///
/// Entity identity (marker ID or individual ID) to frequency distribution, in matrix
/// order, for one axis.
///
/// Each map remembers the matrix generation it was computed from.
///
#[derive(PartialEq, Debug, Clone)]
pub struct AxisFrequencyMap {
    axis: Axis,
    generation: u64,
    entries: Vec<(String, FrequencyDistribution)>,
    index: FxHashMap<String, usize>,
}

impl AxisFrequencyMap {
    pub fn new(
        axis: Axis,
        generation: u64,
        entries: Vec<(String, FrequencyDistribution)>,
    ) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id.clone(), i))
            .collect();

        AxisFrequencyMap {
            axis,
            generation,
            entries,
            index,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, id: &str) -> Option<&FrequencyDistribution> {
        self.index.get(id).map(|i| &self.entries[*i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrequencyDistribution)> {
        self.entries.iter().map(|(id, dist)| (id.as_str(), dist))
    }
}

///
/// Fresh frequency maps for both axes of the same matrix generation.
///
#[derive(PartialEq, Debug, Clone)]
pub struct Summaries {
    pub individuals: AxisFrequencyMap,
    pub markers: AxisFrequencyMap,
}

impl Summaries {
    pub fn for_axis(&self, axis: Axis) -> &AxisFrequencyMap {
        match axis {
            Axis::Individuals => &self.individuals,
            Axis::Markers => &self.markers,
        }
    }

    pub fn into_axis(self, axis: Axis) -> AxisFrequencyMap {
        match axis {
            Axis::Individuals => self.individuals,
            Axis::Markers => self.markers,
        }
    }
}
