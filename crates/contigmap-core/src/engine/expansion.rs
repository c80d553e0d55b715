use super::config::ConfigError;
use super::error::ContigError;
use crate::core::contig::block::{ContigBlock, ReceptorPolicy};
use crate::core::contig::token::ContigToken;
use crate::core::models::chain::{ChainRole, chain_label};
use crate::core::models::residue::{ResidueRange, ResidueRef, ResidueSpecifier};
use tracing::debug;

/// Linear-index jump used at chain termini, where the distance to the next chain is
/// unknown.
pub const CHAIN_BREAK_JUMP: usize = 200;

/// A discontinuity in linear indexing: positions `>= position` advance by `jump`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainBreak {
    pub position: usize,
    pub jump: usize,
}

/// Parallel per-position arrays for one region (inpaint or receptor) of the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRegion {
    pub ref_idx: Vec<ResidueRef>,
    pub hal_idx: Vec<ResidueSpecifier>,
    pub idx_rf: Vec<usize>,
    pub chain_breaks: Vec<ChainBreak>,
}

impl ExpandedRegion {
    pub fn len(&self) -> usize {
        self.ref_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ref_idx.is_empty()
    }

    fn push(&mut self, reference: ResidueRef, chain_id: char, number: usize) {
        self.ref_idx.push(reference);
        self.hal_idx.push(ResidueSpecifier::new(chain_id, number as isize));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedContig {
    pub inpaint: ExpandedRegion,
    pub receptor: ExpandedRegion,
    /// Output chain label of the receptor region, if any label was left for it.
    pub receptor_chain: Option<char>,
    pub inpaint_chains: usize,
}

impl ExpandedContig {
    pub fn ref_idx(&self) -> Vec<ResidueRef> {
        concat(&self.inpaint.ref_idx, &self.receptor.ref_idx)
    }

    pub fn hal_idx(&self) -> Vec<ResidueSpecifier> {
        concat(&self.inpaint.hal_idx, &self.receptor.hal_idx)
    }

    pub fn idx_rf(&self) -> Vec<usize> {
        concat(&self.inpaint.idx_rf, &self.receptor.idx_rf)
    }
}

fn concat<T: Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    out
}

/// Expands resolved blocks into per-position reference, output and linear indices.
///
/// Inpaint chains are labelled `A`, `B`, ... in order; all receptor blocks share the next
/// unused label.
pub fn expand(
    blocks: &[ContigBlock],
    policy: ReceptorPolicy,
) -> Result<ExpandedContig, ContigError> {
    let roles: Vec<ChainRole> = blocks.iter().map(|b| policy.classify(b)).collect();
    let inpaint_chains = roles.iter().filter(|r| **r == ChainRole::Inpaint).count();
    let has_receptor = roles.contains(&ChainRole::Receptor);

    if inpaint_chains > 26 || (has_receptor && inpaint_chains >= 26) {
        return Err(ConfigError::ChainLabelsExhausted {
            required: inpaint_chains + usize::from(has_receptor),
        }
        .into());
    }
    let receptor_chain = chain_label(inpaint_chains);

    let mut inpaint = ExpandedRegion::default();
    let mut receptor = ExpandedRegion::default();
    let mut inpaint_chain_index = 0;

    for (block, role) in blocks.iter().zip(&roles) {
        match role {
            ChainRole::Receptor => {
                // Checked above: a receptor block always has a label.
                let label = receptor_chain.unwrap_or('Z');
                expand_receptor_block(block, label, &mut receptor)?;
            }
            ChainRole::Inpaint => {
                let label = chain_label(inpaint_chain_index).unwrap_or('Z');
                expand_inpaint_block(block, label, &mut inpaint);
                inpaint_chain_index += 1;
            }
        }
    }

    if !policy.is_topology_only() {
        if let Some(last) = inpaint.hal_idx.last() {
            let offset = last.residue_number;
            for hal in &mut receptor.hal_idx {
                hal.residue_number += offset;
            }
        }
    }

    assign_linear_indices(&mut inpaint, &mut receptor);
    debug!(
        inpaint = inpaint.len(),
        receptor = receptor.len(),
        inpaint_chains,
        "Expanded contig."
    );

    Ok(ExpandedContig {
        inpaint,
        receptor,
        receptor_chain: if has_receptor { receptor_chain } else { None },
        inpaint_chains,
    })
}

fn expand_receptor_block(
    block: &ContigBlock,
    label: char,
    region: &mut ExpandedRegion,
) -> Result<(), ContigError> {
    let fragments = block.receptor_fragments()?;
    validate_fragments(block, &fragments)?;

    for (i, fragment) in fragments.iter().enumerate() {
        for residue in fragment.residues() {
            let number = region.len() + 1;
            region.push(residue.into(), label, number);
        }
        let jump = match fragments.get(i + 1) {
            // Fragments are strictly ascending, so the difference is at least 1.
            Some(next) => next.start.abs_diff(fragment.end) - 1,
            None => CHAIN_BREAK_JUMP,
        };
        region.chain_breaks.push(ChainBreak {
            position: region.len(),
            jump,
        });
    }
    Ok(())
}

fn validate_fragments(
    block: &ContigBlock,
    fragments: &[ResidueRange],
) -> Result<(), ContigError> {
    let Some(first) = fragments.first() else {
        return Ok(());
    };
    if let Some(other) = fragments.iter().find(|f| f.chain_id != first.chain_id) {
        return Err(ContigError::MixedChainFragment {
            block: block.to_string(),
            expected: first.chain_id,
            found: other.chain_id,
        });
    }
    for pair in fragments.windows(2) {
        if pair[1].start <= pair[0].end {
            return Err(ContigError::NonMonotonicFragment {
                previous: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

fn expand_inpaint_block(block: &ContigBlock, label: char, region: &mut ExpandedRegion) {
    for token in block.tokens() {
        match token {
            ContigToken::FixedRange(range) => {
                for residue in range.residues() {
                    let number = region.len() + 1;
                    region.push(residue.into(), label, number);
                }
            }
            other => {
                for _ in 0..other.resolved_len().unwrap_or(0) {
                    let number = region.len() + 1;
                    region.push(ResidueRef::Gap, label, number);
                }
            }
        }
    }
    region.chain_breaks.push(ChainBreak {
        position: region.len(),
        jump: CHAIN_BREAK_JUMP,
    });
}

/// Inpaint positions start at 0; receptor positions start 200 past the inpaint region.
/// Every break except the last of each region shifts the indices after it, and every
/// inpaint break additionally pushes the whole receptor region 200 further out.
fn assign_linear_indices(inpaint: &mut ExpandedRegion, receptor: &mut ExpandedRegion) {
    let receptor_start = inpaint.len() + CHAIN_BREAK_JUMP;
    inpaint.idx_rf = (0..inpaint.len()).collect();
    receptor.idx_rf = (receptor_start..receptor_start + receptor.len()).collect();

    if let Some((_, breaks)) = inpaint.chain_breaks.split_last() {
        for brk in breaks {
            for idx in &mut receptor.idx_rf {
                *idx += CHAIN_BREAK_JUMP;
            }
            shift_from(&mut inpaint.idx_rf, brk);
        }
    }
    if let Some((_, breaks)) = receptor.chain_breaks.split_last() {
        for brk in breaks {
            shift_from(&mut receptor.idx_rf, brk);
        }
    }
}

fn shift_from(indices: &mut [usize], brk: &ChainBreak) {
    if let Some(tail) = indices.get_mut(brk.position..) {
        for idx in tail {
            *idx = idx.saturating_add(brk.jump);
        }
    }
}
