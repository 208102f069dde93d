use std::io::BufRead;
use std::path::{Path, PathBuf};

use fxhash::{FxHashMap, FxHashSet};
use log::debug;

use crate::consts::{VCF_DELIMITER, VCF_FIXED_COLUMNS, VCF_HEADER_PREFIX, VCF_META_PREFIX};
use crate::errors::{Result, VcfGenoError};
use crate::models::{Axis, EncodedGenotypeTable, EncodedMarker, GenotypeCode, MarkerRecord};
use crate::utils::get_dynamic_reader;

///
/// GenotypeMatrix struct: markers (rows) × individuals (columns) plus the VCF
/// metadata of every marker.
///
/// The matrix can only shrink. Every removal that actually drops something bumps
/// the matrix `generation`, which frequency maps use to detect that they were
/// computed against an older shape.
///
#[derive(Clone, Debug)]
pub struct GenotypeMatrix {
    individuals: Vec<String>,
    markers: Vec<MarkerRecord>,
    generation: u64,
    skipped_on_load: usize,
    pub path: Option<PathBuf>,
}

impl GenotypeMatrix {
    ///
    /// Build a matrix from already-parsed parts.
    ///
    /// # Arguments
    /// - individuals: sample identifiers, in column order
    /// - markers: marker rows; each must carry one genotype per individual
    ///
    pub fn new(individuals: Vec<String>, markers: Vec<MarkerRecord>) -> Result<Self> {
        let mut seen_individuals: FxHashSet<&str> = FxHashSet::default();
        for individual in &individuals {
            if !seen_individuals.insert(individual.as_str()) {
                return Err(VcfGenoError::MalformedVcf {
                    line: 0,
                    reason: format!("duplicate individual '{}'", individual),
                });
            }
        }

        let mut seen_markers: FxHashSet<&str> = FxHashSet::default();
        for (i, marker) in markers.iter().enumerate() {
            if marker.genotypes().len() != individuals.len() {
                return Err(VcfGenoError::MalformedVcf {
                    line: 0,
                    reason: format!(
                        "marker {} (row {}) has {} genotypes for {} individuals",
                        marker.id,
                        i,
                        marker.genotypes().len(),
                        individuals.len()
                    ),
                });
            }
            if !seen_markers.insert(marker.id.as_str()) {
                return Err(VcfGenoError::MalformedVcf {
                    line: 0,
                    reason: format!("duplicate marker '{}'", marker.id),
                });
            }
        }

        Ok(GenotypeMatrix {
            individuals,
            markers,
            generation: 0,
            skipped_on_load: 0,
            path: None,
        })
    }

    ///
    /// Read a matrix from VCF text.
    ///
    /// `##` meta lines are skipped, the `#CHROM` line supplies the individual
    /// identifiers, and every following line becomes a marker. Markers with a
    /// missing or multi-allelic ALT are dropped silently (they are counted in
    /// [GenotypeMatrix::skipped_on_load]).
    ///
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut individuals: Option<Vec<String>> = None;
        let mut markers: Vec<MarkerRecord> = Vec::new();
        let mut line_numbers: FxHashMap<String, usize> = FxHashMap::default();
        let mut skipped: usize = 0;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);
            let line_number = index + 1;

            if line.is_empty() || line.starts_with(VCF_META_PREFIX) {
                continue;
            }

            if line.starts_with(VCF_HEADER_PREFIX) {
                individuals = Some(parse_header(line, line_number)?);
                continue;
            }

            let n_individuals = match &individuals {
                Some(individuals) => individuals.len(),
                None => {
                    return Err(VcfGenoError::MalformedVcf {
                        line: line_number,
                        reason: "data line found before the #CHROM header".to_string(),
                    });
                }
            };

            match MarkerRecord::from_vcf_line(line, n_individuals, line_number)? {
                Some(marker) => {
                    if let Some(first) = line_numbers.get(&marker.id) {
                        return Err(VcfGenoError::MalformedVcf {
                            line: line_number,
                            reason: format!(
                                "marker {} already defined at line {}",
                                marker.id, first
                            ),
                        });
                    }
                    line_numbers.insert(marker.id.clone(), line_number);
                    markers.push(marker);
                }
                None => skipped += 1,
            }
        }

        let individuals = individuals.ok_or(VcfGenoError::MissingHeader)?;

        debug!(
            "Loaded {} markers x {} individuals ({} non bi-allelic markers skipped)",
            markers.len(),
            individuals.len(),
            skipped
        );

        let mut matrix = GenotypeMatrix::new(individuals, markers)?;
        matrix.skipped_on_load = skipped;

        Ok(matrix)
    }

    pub fn individuals(&self) -> &[String] {
        &self.individuals
    }

    pub fn markers(&self) -> &[MarkerRecord] {
        &self.markers
    }

    pub fn marker(&self, id: &str) -> Option<&MarkerRecord> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn n_individuals(&self) -> usize {
        self.individuals.len()
    }

    pub fn n_markers(&self) -> usize {
        self.markers.len()
    }

    ///
    /// (markers, individuals)
    ///
    pub fn shape(&self) -> (usize, usize) {
        (self.n_markers(), self.n_individuals())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of markers dropped during loading for a missing or multi-allelic ALT.
    pub fn skipped_on_load(&self) -> usize {
        self.skipped_on_load
    }

    ///
    /// Raw genotype strings of one individual, in marker order.
    ///
    pub fn column(&self, individual: &str) -> Option<impl Iterator<Item = &str>> {
        let index = self.individuals.iter().position(|i| i == individual)?;
        Some(
            self.markers
                .iter()
                .map(move |m| m.genotype(index).unwrap_or_default()),
        )
    }

    ///
    /// Drop the given entities along one axis.
    ///
    /// Every identifier must exist; nothing is removed otherwise.
    ///
    /// # Returns
    /// The number of rows or columns removed.
    pub fn remove(&mut self, axis: Axis, ids: &[String]) -> Result<usize> {
        match axis {
            Axis::Individuals => self.remove_individuals(ids),
            Axis::Markers => self.remove_markers(ids),
        }
    }

    pub fn remove_individuals(&mut self, ids: &[String]) -> Result<usize> {
        let doomed = self.resolve(Axis::Individuals, ids)?;
        if doomed.is_empty() {
            return Ok(0);
        }

        let keep: Vec<bool> = self
            .individuals
            .iter()
            .map(|i| !doomed.contains(i.as_str()))
            .collect();

        for marker in self.markers.iter_mut() {
            marker.retain_genotypes(&keep);
        }
        let before = self.individuals.len();
        self.individuals.retain(|i| !doomed.contains(i.as_str()));
        self.generation += 1;

        Ok(before - self.individuals.len())
    }

    pub fn remove_markers(&mut self, ids: &[String]) -> Result<usize> {
        let doomed = self.resolve(Axis::Markers, ids)?;
        if doomed.is_empty() {
            return Ok(0);
        }

        let before = self.markers.len();
        self.markers.retain(|m| !doomed.contains(m.id.as_str()));
        self.generation += 1;

        Ok(before - self.markers.len())
    }

    fn resolve<'a>(&self, axis: Axis, ids: &'a [String]) -> Result<FxHashSet<&'a str>> {
        let known: FxHashSet<&str> = match axis {
            Axis::Individuals => self.individuals.iter().map(|s| s.as_str()).collect(),
            Axis::Markers => self.markers.iter().map(|m| m.id.as_str()).collect(),
        };

        let mut doomed: FxHashSet<&str> = FxHashSet::default();
        for id in ids {
            if !known.contains(id.as_str()) {
                return Err(VcfGenoError::UnknownEntity {
                    axis,
                    id: id.clone(),
                });
            }
            doomed.insert(id.as_str());
        }

        Ok(doomed)
    }

    ///
    /// Consume the matrix into its continuous encoding.
    ///
    /// Every remaining genotype is normalized; all metadata except the derived
    /// marker ID is dropped.
    ///
    pub fn into_encoded(self) -> Result<EncodedGenotypeTable> {
        let individuals = self.individuals;
        let mut rows: Vec<EncodedMarker> = Vec::with_capacity(self.markers.len());

        for marker in self.markers {
            let (id, genotypes) = marker.into_genotypes();
            let codes = genotypes
                .iter()
                .zip(individuals.iter())
                .map(|(raw, individual)| {
                    raw.parse::<GenotypeCode>().map_err(|_| {
                        VcfGenoError::UnrecognizedGenotypeAt {
                            token: leading_token(raw),
                            marker: id.clone(),
                            individual: individual.clone(),
                        }
                    })
                })
                .collect::<Result<Vec<GenotypeCode>>>()?;

            rows.push(EncodedMarker { id, codes });
        }

        Ok(EncodedGenotypeTable::new(individuals, rows))
    }
}

impl TryFrom<&Path> for GenotypeMatrix {
    type Error = VcfGenoError;

    ///
    /// Load a [GenotypeMatrix] from a VCF file, gzipped or not.
    ///
    /// # Arguments:
    /// - value: path to the VCF file on disk.
    fn try_from(value: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(value)?;
        let mut matrix = GenotypeMatrix::from_reader(reader)?;
        matrix.path = Some(value.to_owned());

        Ok(matrix)
    }
}

impl TryFrom<&str> for GenotypeMatrix {
    type Error = VcfGenoError;

    fn try_from(value: &str) -> Result<Self> {
        GenotypeMatrix::try_from(Path::new(value))
    }
}

impl TryFrom<PathBuf> for GenotypeMatrix {
    type Error = VcfGenoError;

    fn try_from(value: PathBuf) -> Result<Self> {
        GenotypeMatrix::try_from(value.as_path())
    }
}

pub(crate) fn leading_token(raw: &str) -> String {
    raw.split(crate::consts::GT_FIELD_DELIMITER)
        .next()
        .unwrap_or(raw)
        .to_string()
}

fn parse_header(line: &str, line_number: usize) -> Result<Vec<String>> {
    let columns: Vec<&str> = line[1..].split(VCF_DELIMITER).collect();

    if columns.len() < VCF_FIXED_COLUMNS.len() {
        return Err(VcfGenoError::MalformedVcf {
            line: line_number,
            reason: format!(
                "header has {} columns, expected at least {}",
                columns.len(),
                VCF_FIXED_COLUMNS.len()
            ),
        });
    }

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for individual in &columns[VCF_FIXED_COLUMNS.len()..] {
        if !seen.insert(*individual) {
            return Err(VcfGenoError::MalformedVcf {
                line: line_number,
                reason: format!("duplicate individual '{}'", individual),
            });
        }
    }

    Ok(columns[VCF_FIXED_COLUMNS.len()..]
        .iter()
        .map(|s| s.to_string())
        .collect())
}
