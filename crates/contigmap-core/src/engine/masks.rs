use super::config::{ConfigError, MaskSource, ProvideSeq, SecondaryStructureSelection};
use super::error::InconsistentConstraint;
use crate::core::models::residue::{ResidueRange, ResidueRef, ResidueSpecifier};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// `true` wherever the output position has a reference residue.
pub fn mask_1d(ref_idx: &[ResidueRef]) -> Vec<bool> {
    ref_idx.iter().map(|r| !r.is_gap()).collect()
}

/// Positions whose reference residue appears in `residues`.
fn listed_positions(ref_idx: &[ResidueRef], residues: &[ResidueRange]) -> Vec<bool> {
    let listed: HashSet<ResidueSpecifier> = residues.iter().flat_map(|r| r.residues()).collect();
    let hits: Vec<bool> = ref_idx
        .iter()
        .map(|r| r.residue().is_some_and(|res| listed.contains(res)))
        .collect();

    let present: HashSet<&ResidueSpecifier> = ref_idx.iter().filter_map(ResidueRef::residue).collect();
    let unmatched = listed.iter().filter(|r| !present.contains(r)).count();
    if unmatched > 0 {
        warn!(
            unmatched,
            "Ignoring listed residues that are not part of the mapping."
        );
    }
    hits
}

/// Builds a sequence or structure mask.
///
/// Without a source the mask equals `mask_1d`. A residue list masks (sets `false`) every
/// position copied from a listed residue. A precomputed mask is used as-is.
pub fn resolve_mask(
    source: Option<&MaskSource>,
    ref_idx: &[ResidueRef],
    mask_1d: &[bool],
    name: &'static str,
) -> Result<Vec<bool>, ConfigError> {
    match source {
        None => Ok(mask_1d.to_vec()),
        Some(MaskSource::Residues(residues)) => {
            let listed = listed_positions(ref_idx, residues);
            Ok(mask_1d
                .iter()
                .zip(listed)
                .map(|(&known, masked)| known && !masked)
                .collect())
        }
        Some(MaskSource::Precomputed(mask)) => {
            if mask.len() != ref_idx.len() {
                return Err(ConfigError::MaskLengthMismatch {
                    mask: name,
                    expected: ref_idx.len(),
                    found: mask.len(),
                });
            }
            debug!(mask = name, "Using precomputed mask.");
            Ok(mask.clone())
        }
    }
}

/// Per-position secondary structure constraints on structure-masked residues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryStructureMasks {
    pub helix: Vec<bool>,
    pub strand: Vec<bool>,
    #[serde(rename = "loop")]
    pub loop_: Vec<bool>,
}

impl SecondaryStructureMasks {
    fn classes(&self) -> [(&'static str, &[bool]); 3] {
        [
            ("helix", self.helix.as_slice()),
            ("strand", self.strand.as_slice()),
            ("loop", self.loop_.as_slice()),
        ]
    }
}

/// Resolves helix/strand/loop residue lists against the mapping.
///
/// Returns `None` when no class was given. Classes without a list are all `false`.
pub fn secondary_structure_masks(
    selection: &SecondaryStructureSelection,
    ref_idx: &[ResidueRef],
    inpaint_str: &[bool],
) -> Result<Option<SecondaryStructureMasks>, InconsistentConstraint> {
    if selection.is_empty() {
        return Ok(None);
    }
    let resolve = |residues: &Option<Vec<ResidueRange>>| match residues {
        Some(list) => listed_positions(ref_idx, list),
        None => vec![false; ref_idx.len()],
    };
    let masks = SecondaryStructureMasks {
        helix: resolve(&selection.helix),
        strand: resolve(&selection.strand),
        loop_: resolve(&selection.loop_),
    };

    for (class, mask) in masks.classes() {
        if let Some(position) = mask
            .iter()
            .zip(inpaint_str)
            .position(|(&tagged, &structure_known)| tagged && structure_known)
        {
            return Err(InconsistentConstraint::NotStructureMasked { class, position });
        }
    }
    for position in 0..ref_idx.len() {
        let assigned = masks
            .classes()
            .iter()
            .filter(|(_, mask)| mask[position])
            .count();
        if assigned > 1 {
            return Err(InconsistentConstraint::MultipleClasses { position });
        }
    }
    Ok(Some(masks))
}

/// Marks the sequence of the given output positions as provided.
pub fn apply_provide_seq(inpaint_seq: &mut [bool], provide: &ProvideSeq) -> Result<(), ConfigError> {
    let length = inpaint_seq.len();
    for position in provide.positions() {
        let slot = inpaint_seq
            .get_mut(position)
            .ok_or(ConfigError::ProvideSeqOutOfRange { position, length })?;
        *slot = true;
    }
    Ok(())
}
