use crate::core::models::reference::PdbIndex;
use crate::core::models::residue::ResidueSpecifier;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbIndexError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

#[derive(Debug, Deserialize)]
struct PdbIndexRecord {
    chain: char,
    residue: isize,
}

/// Loads the reference residue ordering from a headered `chain,residue` CSV file.
pub fn read_from_path(path: &Path) -> Result<PdbIndex, PdbIndexError> {
    let reader = csv::Reader::from_path(path).map_err(|e| PdbIndexError::Csv {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    collect(reader, &path.to_string_lossy())
}

pub fn read_from(reader: impl Read) -> Result<PdbIndex, PdbIndexError> {
    collect(csv::Reader::from_reader(reader), "<reader>")
}

fn collect<R: Read>(mut reader: csv::Reader<R>, origin: &str) -> Result<PdbIndex, PdbIndexError> {
    let mut index = PdbIndex::new();
    for result in reader.deserialize::<PdbIndexRecord>() {
        let record = result.map_err(|e| PdbIndexError::Csv {
            path: origin.to_string(),
            source: e,
        })?;
        index.push(ResidueSpecifier::new(record.chain, record.residue));
    }
    Ok(index)
}
