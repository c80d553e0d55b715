use super::export::{ComplexMappings, Mappings};
use crate::core::contig::block::{ContigSpec, ReceptorPolicy};
use crate::core::contig::token::ContigToken;
use crate::core::models::reference::ReferenceResidues;
use crate::core::models::residue::{ResidueRef, ResidueSpecifier};
use crate::engine::config::{ContigMapConfig, MappingSource, PreciseMapping};
use crate::engine::error::ContigError;
use crate::engine::expansion::{self, ExpandedContig, ExpandedRegion};
use crate::engine::masks::{self, SecondaryStructureMasks};
use crate::engine::sampling::LengthSampler;
use crate::engine::symmetry::ChainLayout;
use rand::Rng;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// Parallel per-position arrays over the full output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingSet {
    pub ref_idx: Vec<ResidueRef>,
    pub hal_idx: Vec<ResidueSpecifier>,
    pub idx_rf: Vec<usize>,
    pub mask_1d: Vec<bool>,
    /// `true` where the sequence is known, `false` where it is designed.
    pub inpaint_seq: Vec<bool>,
    /// `true` where the structure is known, `false` where it is designed.
    pub inpaint_str: Vec<bool>,
}

impl MappingSet {
    pub fn len(&self) -> usize {
        self.ref_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ref_idx.is_empty()
    }
}

/// 0-indexed positions of the non-gap residues of one output array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Idx0 {
    /// Position of each residue in the reference residue list.
    pub ref_idx0: Vec<usize>,
    /// Position of each residue in the output array it was taken from.
    pub hal_idx0: Vec<usize>,
}

impl Idx0 {
    fn resolve<R>(reference: &R, ref_idx: &[ResidueRef]) -> Result<Self, ContigError>
    where
        R: ReferenceResidues + ?Sized,
    {
        let mut idx0 = Self::default();
        for (position, entry) in ref_idx.iter().enumerate() {
            let Some(residue) = entry.residue() else {
                continue;
            };
            let reference_position = reference
                .position(residue)
                .ok_or(ContigError::ResidueNotFound { residue: *residue })?;
            idx0.hal_idx0.push(position);
            idx0.ref_idx0.push(reference_position);
        }
        Ok(idx0)
    }
}

/// The complete mapping between reference space and output space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigMap {
    pub mapping: MappingSet,
    pub secondary_structure: Option<SecondaryStructureMasks>,
    /// Resolved contig, one entry per chain. Empty for precise mappings.
    pub sampled_mask: Vec<String>,
    pub inpaint: ExpandedRegion,
    pub receptor: ExpandedRegion,
    pub receptor_chain: Option<char>,
    pub inpaint_chains: usize,
    pub idx0: Idx0,
    pub inpaint_idx0: Idx0,
    pub receptor_idx0: Idx0,
}

impl ContigMap {
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Non-gap reference residues of the full mapping, in output order.
    pub fn con_ref_pdb_idx(&self) -> Vec<ResidueSpecifier> {
        non_gap_residues(&self.mapping.ref_idx)
    }

    /// Aggregates the map into the named projections consumed downstream.
    pub fn mappings(&self) -> Mappings {
        let complex = (self.inpaint.ref_idx != self.mapping.ref_idx).then(|| ComplexMappings {
            complex_con_ref_pdb_idx: non_gap_residues(&self.mapping.ref_idx),
            complex_con_hal_pdb_idx: non_gap_outputs(&self.mapping.ref_idx, &self.mapping.hal_idx),
            complex_con_ref_idx0: self.idx0.ref_idx0.clone(),
            complex_con_hal_idx0: self.idx0.hal_idx0.clone(),
            receptor_con_ref_pdb_idx: non_gap_residues(&self.receptor.ref_idx),
            receptor_con_hal_pdb_idx: non_gap_outputs(&self.receptor.ref_idx, &self.receptor.hal_idx),
            receptor_con_ref_idx0: self.receptor_idx0.ref_idx0.clone(),
            receptor_con_hal_idx0: self.receptor_idx0.hal_idx0.clone(),
        });

        Mappings {
            con_ref_pdb_idx: non_gap_residues(&self.inpaint.ref_idx),
            con_hal_pdb_idx: non_gap_outputs(&self.inpaint.ref_idx, &self.inpaint.hal_idx),
            con_ref_idx0: self.inpaint_idx0.ref_idx0.clone(),
            con_hal_idx0: self.inpaint_idx0.hal_idx0.clone(),
            complex,
            inpaint_str: self.mapping.inpaint_str.clone(),
            inpaint_seq: self.mapping.inpaint_seq.clone(),
            sampled_mask: self.sampled_mask.clone(),
            mask_1d: self.mapping.mask_1d.clone(),
        }
    }
}

fn non_gap_residues(ref_idx: &[ResidueRef]) -> Vec<ResidueSpecifier> {
    ref_idx.iter().filter_map(ResidueRef::residue).copied().collect()
}

fn non_gap_outputs(ref_idx: &[ResidueRef], hal_idx: &[ResidueSpecifier]) -> Vec<ResidueSpecifier> {
    ref_idx
        .iter()
        .zip(hal_idx)
        .filter(|(r, _)| !r.is_gap())
        .map(|(_, hal)| *hal)
        .collect()
}

/// Builds a [`ContigMap`] against `reference`.
///
/// Randomness only enters through length sampling, so a seeded `rng` makes the result
/// reproducible. Nothing is returned unless every stage succeeds.
#[instrument(skip_all, name = "contig_map_workflow")]
pub fn run<R>(
    reference: &R,
    config: &ContigMapConfig,
    rng: &mut impl Rng,
) -> Result<ContigMap, ContigError>
where
    R: ReferenceResidues + ?Sized,
{
    // === Phase 1: Resolve the reference/output mapping ===
    let (expanded, sampled_mask) = match &config.source {
        MappingSource::Contigs(contigs) => sample_and_expand(reference, contigs, config, rng)?,
        MappingSource::Precise(precise) => {
            info!(length = precise.ref_idx.len(), "Using precise mapping.");
            (from_precise(precise), Vec::new())
        }
    };
    let ref_idx = expanded.ref_idx();
    let hal_idx = expanded.hal_idx();
    let idx_rf = expanded.idx_rf();

    // === Phase 2: Sequence and structure masks ===
    let mask_1d = masks::mask_1d(&ref_idx);
    let mut inpaint_seq = masks::resolve_mask(
        config.masks.inpaint_seq.as_ref(),
        &ref_idx,
        &mask_1d,
        "inpaint_seq",
    )?;
    let inpaint_str = masks::resolve_mask(
        config.masks.inpaint_str.as_ref(),
        &ref_idx,
        &mask_1d,
        "inpaint_str",
    )?;

    // === Phase 3: 0-indexed lookups into the reference ===
    let idx0 = Idx0::resolve(reference, &ref_idx)?;
    let inpaint_idx0 = Idx0::resolve(reference, &expanded.inpaint.ref_idx)?;
    let receptor_idx0 = Idx0::resolve(reference, &expanded.receptor.ref_idx)?;

    // === Phase 4: Partial diffusion override ===
    if let Some(provide_seq) = &config.masks.provide_seq {
        masks::apply_provide_seq(&mut inpaint_seq, provide_seq)?;
        debug!("Applied provide_seq override.");
    }

    // === Phase 5: Secondary structure constraints ===
    let secondary_structure = masks::secondary_structure_masks(
        &config.masks.secondary_structure,
        &ref_idx,
        &inpaint_str,
    )?;

    let ExpandedContig {
        inpaint,
        receptor,
        receptor_chain,
        inpaint_chains,
    } = expanded;

    info!(
        length = ref_idx.len(),
        inpaint = inpaint.len(),
        receptor = receptor.len(),
        "Contig map complete."
    );

    Ok(ContigMap {
        mapping: MappingSet {
            ref_idx,
            hal_idx,
            idx_rf,
            mask_1d,
            inpaint_seq,
            inpaint_str,
        },
        secondary_structure,
        sampled_mask,
        inpaint,
        receptor,
        receptor_chain,
        inpaint_chains,
        idx0,
        inpaint_idx0,
        receptor_idx0,
    })
}

fn sample_and_expand<R>(
    reference: &R,
    contigs: &str,
    config: &ContigMapConfig,
    rng: &mut impl Rng,
) -> Result<(ExpandedContig, Vec<String>), ContigError>
where
    R: ReferenceResidues + ?Sized,
{
    let spec: ContigSpec = contigs.parse()?;
    check_range_endpoints(reference, &spec)?;
    let policy = ReceptorPolicy::from_topology_flag(config.topology_only);
    let layout = ChainLayout::plan(spec.into_blocks(), config.sampling.symmetry_order)?;
    let sampled = LengthSampler::new(policy, &config.sampling).sample(&layout, rng)?;
    let expanded = expansion::expand(&sampled.blocks, policy)?;
    Ok((expanded, sampled.sampled_mask()))
}

/// Every reference range must start and end on a reference residue. Checked before
/// expansion so a mistyped range fails without being materialized.
fn check_range_endpoints<R>(reference: &R, spec: &ContigSpec) -> Result<(), ContigError>
where
    R: ReferenceResidues + ?Sized,
{
    let endpoints = spec
        .blocks()
        .iter()
        .flat_map(|block| block.tokens())
        .filter_map(|token| match token {
            ContigToken::FixedRange(range) => Some(range),
            _ => None,
        })
        .flat_map(|range| {
            [
                ResidueSpecifier::new(range.chain_id, range.start),
                ResidueSpecifier::new(range.chain_id, range.end),
            ]
        });
    for residue in endpoints {
        if !reference.contains(&residue) {
            return Err(ContigError::ResidueNotFound { residue });
        }
    }
    Ok(())
}

/// A precise mapping is taken as one inpaint region with no receptor.
fn from_precise(precise: &PreciseMapping) -> ExpandedContig {
    let chains: HashSet<char> = precise.hal_idx.iter().map(|h| h.chain_id).collect();
    ExpandedContig {
        inpaint: ExpandedRegion {
            ref_idx: precise.ref_idx.clone(),
            hal_idx: precise.hal_idx.clone(),
            idx_rf: precise.idx_rf.clone(),
            chain_breaks: Vec::new(),
        },
        receptor: ExpandedRegion::default(),
        receptor_chain: None,
        inpaint_chains: chains.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::reference::PdbIndex;
    use crate::core::models::residue::ResidueRange;
    use crate::engine::config::{ConfigError, ContigMapConfigBuilder, MaskSource, ProvideSeq};
    use crate::engine::error::InconsistentConstraint;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn reference() -> PdbIndex {
        (1..=30)
            .map(|n| ResidueSpecifier::new('A', n))
            .chain((1..=20).map(|n| ResidueSpecifier::new('B', n)))
            .collect()
    }

    fn build(builder: ContigMapConfigBuilder) -> Result<ContigMap, ContigError> {
        let config = builder.build()?;
        run(&reference(), &config, &mut StdRng::seed_from_u64(11))
    }

    fn ranges(s: &str) -> Vec<ResidueRange> {
        ResidueRange::parse_list(s).unwrap()
    }

    #[test]
    fn binder_design_maps_receptor_after_generated_chain() {
        let map = build(ContigMapConfigBuilder::new().contigs("5-5 B1-4")).unwrap();

        assert_eq!(map.len(), 9);
        assert_eq!(map.inpaint_chains, 1);
        assert_eq!(map.receptor_chain, Some('B'));
        assert_eq!(map.sampled_mask, vec!["5-5", "B1-4/0"]);
        assert_eq!(map.mapping.mask_1d[..5], [false; 5]);
        assert_eq!(map.mapping.mask_1d[5..], [true; 4]);
        assert_eq!(map.mapping.idx_rf, vec![0, 1, 2, 3, 4, 205, 206, 207, 208]);

        let hal: Vec<String> = map.mapping.hal_idx.iter().map(|h| h.to_string()).collect();
        assert_eq!(hal, vec!["A1", "A2", "A3", "A4", "A5", "B6", "B7", "B8", "B9"]);

        // B1 sits after the 30 residues of chain A in the reference.
        assert_eq!(map.idx0.ref_idx0, vec![30, 31, 32, 33]);
        assert_eq!(map.idx0.hal_idx0, vec![5, 6, 7, 8]);
        assert_eq!(map.receptor_idx0.hal_idx0, vec![0, 1, 2, 3]);
        assert!(map.inpaint_idx0.ref_idx0.is_empty());
    }

    #[test]
    fn motif_scaffolding_has_no_receptor() {
        let map = build(ContigMapConfigBuilder::new().contigs("2-2/A10-12/3-3")).unwrap();
        assert_eq!(map.receptor_chain, None);
        assert!(map.receptor.is_empty());
        assert_eq!(
            map.con_ref_pdb_idx(),
            vec![
                ResidueSpecifier::new('A', 10),
                ResidueSpecifier::new('A', 11),
                ResidueSpecifier::new('A', 12),
            ]
        );
        assert_eq!(map.inpaint_idx0.ref_idx0, vec![9, 10, 11]);
        assert_eq!(map.inpaint_idx0.hal_idx0, vec![2, 3, 4]);
        assert!(map.mappings().complex.is_none());
    }

    #[test]
    fn masks_default_to_mask_1d() {
        let map = build(ContigMapConfigBuilder::new().contigs("A1-3/4-4")).unwrap();
        assert_eq!(map.mapping.inpaint_seq, map.mapping.mask_1d);
        assert_eq!(map.mapping.inpaint_str, map.mapping.mask_1d);
        assert!(map.secondary_structure.is_none());
    }

    #[test]
    fn inpaint_seq_residues_are_designed() {
        let map = build(
            ContigMapConfigBuilder::new()
                .contigs("A1-4/2-2")
                .inpaint_seq(MaskSource::Residues(ranges("A2-3"))),
        )
        .unwrap();
        assert_eq!(
            map.mapping.inpaint_seq,
            vec![true, false, false, true, false, false]
        );
        assert_eq!(map.mapping.inpaint_str, map.mapping.mask_1d);
    }

    #[test]
    fn provide_seq_is_applied_after_masking() {
        let map = build(
            ContigMapConfigBuilder::new()
                .contigs("A1-4/2-2")
                .inpaint_seq(MaskSource::Residues(ranges("A1-4")))
                .provide_seq(ProvideSeq::new(vec![0..=1, 5..=5])),
        )
        .unwrap();
        assert_eq!(
            map.mapping.inpaint_seq,
            vec![true, true, false, false, false, true]
        );
    }

    #[test]
    fn provide_seq_past_the_end_fails() {
        let result = build(
            ContigMapConfigBuilder::new()
                .contigs("3-3")
                .provide_seq(ProvideSeq::new(vec![2..=3])),
        );
        assert!(matches!(
            result,
            Err(ContigError::Configuration(
                ConfigError::ProvideSeqOutOfRange {
                    position: 3,
                    length: 3
                }
            ))
        ));
    }

    #[test]
    fn helix_on_structure_masked_residues_is_accepted() {
        let map = build(
            ContigMapConfigBuilder::new()
                .contigs("A1-4/2-2")
                .inpaint_str(MaskSource::Residues(ranges("A2-3")))
                .helix(ranges("A2-3")),
        )
        .unwrap();
        let ss = map.secondary_structure.unwrap();
        assert_eq!(ss.helix, vec![false, true, true, false, false, false]);
        assert_eq!(ss.strand, vec![false; 6]);
    }

    #[test]
    fn helix_on_known_structure_fails() {
        let result = build(
            ContigMapConfigBuilder::new()
                .contigs("A1-4/2-2")
                .helix(ranges("A2")),
        );
        assert!(matches!(
            result,
            Err(ContigError::InconsistentConstraint(
                InconsistentConstraint::NotStructureMasked { class: "helix", .. }
            ))
        ));
    }

    #[test]
    fn residue_outside_reference_fails() {
        let result = build(ContigMapConfigBuilder::new().contigs("C1-3/2-2"));
        assert!(matches!(
            result,
            Err(ContigError::ResidueNotFound { residue }) if residue == ResidueSpecifier::new('C', 1)
        ));
    }

    #[test]
    fn oversized_range_fails_on_its_endpoint() {
        for contigs in ["A1-2000000000/5", "A1-9223372036854775807"] {
            let result = build(ContigMapConfigBuilder::new().contigs(contigs));
            assert!(
                matches!(
                    result,
                    Err(ContigError::ResidueNotFound { residue })
                        if residue.chain_id == 'A' && residue.residue_number > 30
                ),
                "{contigs} should fail on its missing end residue"
            );
        }
    }

    #[test]
    fn overflowing_generated_length_is_a_typed_error() {
        let result = build(ContigMapConfigBuilder::new().contigs("18446744073709551615/1"));
        assert!(matches!(result, Err(ContigError::LengthOverflow { .. })));
    }

    #[test]
    fn listed_residue_is_masked_in_every_symmetric_copy() {
        let map = build(
            ContigMapConfigBuilder::new()
                .contigs("A1-5/10")
                .symmetry_order(3)
                .inpaint_seq(MaskSource::Residues(ranges("A2"))),
        )
        .unwrap();

        assert_eq!(map.len(), 45);
        let masked: Vec<usize> = map
            .mapping
            .inpaint_seq
            .iter()
            .zip(&map.mapping.mask_1d)
            .enumerate()
            .filter(|(_, (known, reference))| **reference && !**known)
            .map(|(position, _)| position)
            .collect();
        assert_eq!(masked, vec![1, 16, 31]);
        assert!(
            masked
                .iter()
                .all(|&p| map.mapping.ref_idx[p] == ResidueRef::new('A', 2))
        );
    }

    #[test]
    fn grammar_errors_surface_from_the_workflow() {
        let result = build(ContigMapConfigBuilder::new().contigs("A1-5/x"));
        assert!(matches!(result, Err(ContigError::Grammar(_))));
    }

    #[test]
    fn precise_mapping_is_reproduced_exactly() {
        let ref_idx = vec![ResidueRef::new('A', 5), ResidueRef::Gap, ResidueRef::new('A', 6)];
        let hal_idx = vec![
            ResidueSpecifier::new('A', 1),
            ResidueSpecifier::new('A', 2),
            ResidueSpecifier::new('A', 3),
        ];
        let idx_rf = vec![0, 1, 2];
        let map = build(
            ContigMapConfigBuilder::new()
                .ref_idx(ref_idx.clone())
                .hal_idx(hal_idx.clone())
                .idx_rf(idx_rf.clone()),
        )
        .unwrap();
        assert_eq!(map.mapping.ref_idx, ref_idx);
        assert_eq!(map.mapping.hal_idx, hal_idx);
        assert_eq!(map.mapping.idx_rf, idx_rf);
        assert_eq!(map.mapping.mask_1d, vec![true, false, true]);
        assert!(map.sampled_mask.is_empty());
        assert_eq!(map.inpaint_chains, 1);
    }

    #[test]
    fn complex_projections_cover_the_whole_mapping() {
        let map = build(ContigMapConfigBuilder::new().contigs("A1-2/2-2 B5-6")).unwrap();
        let mappings = map.mappings();
        let complex = mappings.complex.unwrap();

        assert_eq!(
            mappings.con_ref_pdb_idx,
            vec![ResidueSpecifier::new('A', 1), ResidueSpecifier::new('A', 2)]
        );
        assert_eq!(complex.complex_con_ref_idx0, vec![0, 1, 34, 35]);
        assert_eq!(complex.complex_con_hal_idx0, vec![0, 1, 4, 5]);
        assert_eq!(complex.receptor_con_ref_idx0, vec![34, 35]);
        assert_eq!(complex.receptor_con_hal_idx0, vec![0, 1]);
        assert_eq!(
            complex.receptor_con_hal_pdb_idx,
            vec![ResidueSpecifier::new('B', 5), ResidueSpecifier::new('B', 6)]
        );
    }
}
