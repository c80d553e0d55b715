use super::residue::ResidueSpecifier;
use std::collections::HashMap;

/// Read-only view of the reference structure's ordered residue list.
///
/// The structure parser that produces this list lives outside this crate; the mapping
/// only needs membership and position lookups.
pub trait ReferenceResidues {
    /// 0-based position of `residue` in the reference ordering.
    fn position(&self, residue: &ResidueSpecifier) -> Option<usize>;

    fn len(&self) -> usize;

    fn contains(&self, residue: &ResidueSpecifier) -> bool {
        self.position(residue).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered reference residue identifiers with a position index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdbIndex {
    residues: Vec<ResidueSpecifier>,
    positions: HashMap<ResidueSpecifier, usize>,
}

impl PdbIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a residue. Duplicates keep the position of their first occurrence.
    pub fn push(&mut self, residue: ResidueSpecifier) {
        self.positions.entry(residue).or_insert(self.residues.len());
        self.residues.push(residue);
    }

    pub fn residues(&self) -> &[ResidueSpecifier] {
        &self.residues
    }

    pub fn get(&self, index: usize) -> Option<&ResidueSpecifier> {
        self.residues.get(index)
    }
}

impl FromIterator<ResidueSpecifier> for PdbIndex {
    fn from_iter<I: IntoIterator<Item = ResidueSpecifier>>(iter: I) -> Self {
        let mut index = PdbIndex::new();
        for residue in iter {
            index.push(residue);
        }
        index
    }
}

impl ReferenceResidues for PdbIndex {
    fn position(&self, residue: &ResidueSpecifier) -> Option<usize> {
        self.positions.get(residue).copied()
    }

    fn len(&self) -> usize {
        self.residues.len()
    }
}

impl ReferenceResidues for [ResidueSpecifier] {
    fn position(&self, residue: &ResidueSpecifier) -> Option<usize> {
        self.iter().position(|r| r == residue)
    }

    fn len(&self) -> usize {
        <[ResidueSpecifier]>::len(self)
    }
}
