use crate::core::models::residue::ResidueSpecifier;
use serde::Serialize;

/// Named projections of a [`ContigMap`](super::map::ContigMap) handed to the generation
/// process.
///
/// The `con_*` fields describe the inpaint region only. When a receptor is present the
/// `complex_*` and `receptor_*` projections are included as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mappings {
    pub con_ref_pdb_idx: Vec<ResidueSpecifier>,
    pub con_hal_pdb_idx: Vec<ResidueSpecifier>,
    pub con_ref_idx0: Vec<usize>,
    pub con_hal_idx0: Vec<usize>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub complex: Option<ComplexMappings>,
    pub inpaint_str: Vec<bool>,
    pub inpaint_seq: Vec<bool>,
    pub sampled_mask: Vec<String>,
    pub mask_1d: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexMappings {
    pub complex_con_ref_pdb_idx: Vec<ResidueSpecifier>,
    pub complex_con_hal_pdb_idx: Vec<ResidueSpecifier>,
    pub complex_con_ref_idx0: Vec<usize>,
    pub complex_con_hal_idx0: Vec<usize>,
    pub receptor_con_ref_pdb_idx: Vec<ResidueSpecifier>,
    pub receptor_con_hal_pdb_idx: Vec<ResidueSpecifier>,
    pub receptor_con_ref_idx0: Vec<usize>,
    pub receptor_con_hal_idx0: Vec<usize>,
}

impl Mappings {
    pub fn has_receptor(&self) -> bool {
        self.complex.is_some()
    }
}
