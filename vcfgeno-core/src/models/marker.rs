use crate::consts::{
    MARKER_ID_SEPARATOR, VCF_ALT_DELIMITER, VCF_DELIMITER, VCF_FIXED_COLUMNS, VCF_MISSING_ALT,
};
use crate::errors::{Result, VcfGenoError};

///
/// One VCF data line: the fixed metadata columns plus the raw sample fields, in the
/// same order as the individuals of the owning matrix.
///
/// The VCF `ID` column is discarded; `id` is always derived as `CHROM_POS`.
///
#[derive(PartialEq, Debug, Clone)]
pub struct MarkerRecord {
    pub chrom: String,
    pub pos: u64,
    pub id: String,
    pub ref_allele: String,
    pub alt: String,
    pub qual: String,
    pub filter: String,
    pub info: String,
    pub format: String,

    genotypes: Vec<String>,
}

impl MarkerRecord {
    pub fn new(
        chrom: &str,
        pos: u64,
        ref_allele: &str,
        alt: &str,
        genotypes: Vec<String>,
    ) -> Self {
        MarkerRecord {
            chrom: chrom.to_string(),
            pos,
            id: marker_id(chrom, pos),
            ref_allele: ref_allele.to_string(),
            alt: alt.to_string(),
            qual: VCF_MISSING_ALT.to_string(),
            filter: VCF_MISSING_ALT.to_string(),
            info: VCF_MISSING_ALT.to_string(),
            format: "GT".to_string(),
            genotypes,
        }
    }

    ///
    /// Parse a single VCF data line.
    ///
    /// Returns `Ok(None)` for rows that are kept out of the matrix by policy:
    /// a missing ALT (`.`) or more than one ALT allele.
    ///
    /// # Arguments
    /// - line: the raw tab-delimited line
    /// - n_individuals: number of sample columns declared by the header
    /// - line_number: 1-based line number, for error messages
    ///
    pub fn from_vcf_line(
        line: &str,
        n_individuals: usize,
        line_number: usize,
    ) -> Result<Option<Self>> {
        let fields: Vec<&str> = line.split(VCF_DELIMITER).collect();
        let expected = VCF_FIXED_COLUMNS.len() + n_individuals;

        if fields.len() != expected {
            return Err(VcfGenoError::MalformedVcf {
                line: line_number,
                reason: format!("expected {} fields, found {}", expected, fields.len()),
            });
        }

        let alt = fields[4];
        if !is_biallelic_alt(alt) {
            return Ok(None);
        }

        let chrom = fields[0];
        let pos: u64 = fields[1].parse().map_err(|_| VcfGenoError::MalformedVcf {
            line: line_number,
            reason: format!("can't parse POS '{}'", fields[1]),
        })?;

        Ok(Some(MarkerRecord {
            chrom: chrom.to_string(),
            pos,
            id: marker_id(chrom, pos),
            ref_allele: fields[3].to_string(),
            alt: alt.to_string(),
            qual: fields[5].to_string(),
            filter: fields[6].to_string(),
            info: fields[7].to_string(),
            format: fields[8].to_string(),
            genotypes: fields[VCF_FIXED_COLUMNS.len()..]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }))
    }

    ///
    /// Raw sample fields, aligned with the individuals of the owning matrix.
    ///
    pub fn genotypes(&self) -> &[String] {
        &self.genotypes
    }

    pub fn genotype(&self, index: usize) -> Option<&str> {
        self.genotypes.get(index).map(|s| s.as_str())
    }

    /// Keep only the sample fields whose flag is `true`.
    pub(crate) fn retain_genotypes(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.genotypes
            .retain(|_| flags.next().copied().unwrap_or(false));
    }

    pub(crate) fn into_genotypes(self) -> (String, Vec<String>) {
        (self.id, self.genotypes)
    }
}

///
/// Derived marker identifier, `CHROM_POS`.
///
pub fn marker_id(chrom: &str, pos: u64) -> String {
    format!("{}{}{}", chrom, MARKER_ID_SEPARATOR, pos)
}

fn is_biallelic_alt(alt: &str) -> bool {
    !alt.is_empty() && alt != VCF_MISSING_ALT && !alt.contains(VCF_ALT_DELIMITER)
}
