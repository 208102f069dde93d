use std::io::Write;
use std::path::Path;

use log::info;

use crate::consts::OUTPUT_ID_COLUMN;
use crate::errors::Result;
use crate::models::GenotypeCode;
use crate::utils::get_dynamic_writer;

///
/// One output row: the derived marker ID and the continuous codes, aligned with the
/// table's individuals.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct EncodedMarker {
    pub id: String,
    pub codes: Vec<GenotypeCode>,
}

///
/// The finalized genotype table, keyed by marker ID with one column per individual.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct EncodedGenotypeTable {
    individuals: Vec<String>,
    rows: Vec<EncodedMarker>,
}

impl EncodedGenotypeTable {
    pub fn new(individuals: Vec<String>, rows: Vec<EncodedMarker>) -> Self {
        EncodedGenotypeTable { individuals, rows }
    }

    pub fn individuals(&self) -> &[String] {
        &self.individuals
    }

    pub fn rows(&self) -> &[EncodedMarker] {
        &self.rows
    }

    pub fn get(&self, marker: &str, individual: &str) -> Option<GenotypeCode> {
        let col = self.individuals.iter().position(|i| i == individual)?;
        let row = self.rows.iter().find(|r| r.id == marker)?;
        row.codes.get(col).copied()
    }

    ///
    /// (markers, individuals)
    ///
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.individuals.len())
    }

    ///
    /// Write the table as CSV: a header `ID,<individual...>` followed by one line per
    /// marker with codes rendered as `0`, `1`, `2` or `.`.
    ///
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);

        let mut header: Vec<&str> = Vec::with_capacity(self.individuals.len() + 1);
        header.push(OUTPUT_ID_COLUMN);
        header.extend(self.individuals.iter().map(|s| s.as_str()));
        wtr.write_record(&header)?;

        for row in &self.rows {
            let mut record: Vec<&str> = Vec::with_capacity(row.codes.len() + 1);
            record.push(row.id.as_str());
            record.extend(row.codes.iter().map(|c| c.symbol()));
            wtr.write_record(&record)?;
        }

        wtr.flush()?;

        Ok(())
    }

    ///
    /// Write the table to a CSV file, gzip-compressed when the path ends in `.gz`.
    ///
    /// # Arguments
    /// - path: the output file; parent directories are created as needed
    ///
    pub fn to_csv<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            info!("{} already exists. Overwriting existing file", path.display());
        }

        let writer = get_dynamic_writer(path)?;
        self.write_csv(writer)?;

        Ok(())
    }
}
