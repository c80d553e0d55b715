use super::config::{LengthRange, SamplingConfig};
use super::error::{ContigError, UnmetConstraint};
use super::symmetry::ChainLayout;
use super::utils::retry::{Attempt, bounded_retry};
use crate::core::contig::block::{ContigBlock, ReceptorPolicy};
use crate::core::contig::token::ContigToken;
use crate::core::models::chain::ChainRole;
use rand::Rng;
use tracing::{debug, info, instrument, trace};

/// A contig whose generated lengths have all been fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledContig {
    /// Final chain list, after symmetry expansion.
    pub blocks: Vec<ContigBlock>,
    /// Total number of positions in inpaint chains.
    pub length: usize,
    pub inpaint_chains: usize,
}

impl SampledContig {
    /// The resolved blocks rendered back to contig text.
    pub fn sampled_mask(&self) -> Vec<String> {
        self.blocks.iter().map(ToString::to_string).collect()
    }
}

/// Replaces every `RangedLength` with a uniformly sampled `FixedLength`.
pub fn resolve_block(block: &ContigBlock, rng: &mut impl Rng) -> ContigBlock {
    let tokens = block
        .tokens()
        .iter()
        .map(|token| match *token {
            ContigToken::RangedLength { lo, hi } => ContigToken::FixedLength(rng.gen_range(lo..=hi)),
            other => other,
        })
        .collect();
    ContigBlock::new(tokens)
}

/// Number of output positions a resolved inpaint block occupies.
///
/// Saturates at `usize::MAX`; [`LengthSampler::sample`] rejects layouts whose upper bound
/// does not fit before any block is resolved.
pub fn block_length(block: &ContigBlock) -> usize {
    block
        .tokens()
        .iter()
        .filter_map(ContigToken::resolved_len)
        .fold(0, usize::saturating_add)
}

pub struct LengthSampler {
    policy: ReceptorPolicy,
    length: Option<LengthRange>,
    symmetry_order: Option<usize>,
    max_attempts: usize,
}

impl LengthSampler {
    pub fn new(policy: ReceptorPolicy, config: &SamplingConfig) -> Self {
        Self {
            policy,
            length: config.length,
            symmetry_order: config.symmetry_order,
            max_attempts: config.max_attempts,
        }
    }

    /// Resolves the layout until its total inpaint length meets the length window and
    /// symmetry constraints, or the attempt cap is reached.
    #[instrument(level = "debug", skip_all, fields(max_attempts = self.max_attempts))]
    pub fn sample(
        &self,
        layout: &ChainLayout,
        rng: &mut impl Rng,
    ) -> Result<SampledContig, ContigError> {
        let upper_bound = self.max_inpaint_length(layout)?;
        debug!(upper_bound, "Checked inpaint length bound.");

        let result = bounded_retry(self.max_attempts, |attempt| {
            let sampled = self.sample_once(layout, rng);
            match self.unmet_constraint(sampled.length) {
                None => Attempt::Accept(sampled),
                Some(unmet) => {
                    trace!(attempt, length = sampled.length, %unmet, "Rejected sampled contig.");
                    Attempt::Reject(unmet)
                }
            }
        });

        match result {
            Ok(sampled) => {
                info!(
                    length = sampled.length,
                    inpaint_chains = sampled.inpaint_chains,
                    "Sampled contig: {}",
                    sampled.sampled_mask().join(" ")
                );
                Ok(sampled)
            }
            Err(exhausted) => Err(ContigError::UnsatisfiableConstraint {
                constraint: exhausted.last_rejection,
                attempts: exhausted.attempts,
            }),
        }
    }

    fn sample_once(&self, layout: &ChainLayout, rng: &mut impl Rng) -> SampledContig {
        let resolved = layout
            .templates()
            .iter()
            .map(|block| match self.policy.classify(block) {
                ChainRole::Receptor => block.clone(),
                ChainRole::Inpaint => resolve_block(block, rng),
            })
            .collect();
        let blocks = layout.assemble(resolved);

        let mut length: usize = 0;
        let mut inpaint_chains = 0;
        for block in &blocks {
            if self.policy.classify(block) == ChainRole::Inpaint {
                inpaint_chains += 1;
                length = length.saturating_add(block_length(block));
            }
        }
        SampledContig {
            blocks,
            length,
            inpaint_chains,
        }
    }

    /// Total inpaint length when every open range takes its upper bound.
    fn max_inpaint_length(&self, layout: &ChainLayout) -> Result<usize, ContigError> {
        let blocks = layout.assemble(layout.templates().to_vec());
        blocks
            .iter()
            .filter(|block| self.policy.classify(block) == ChainRole::Inpaint)
            .try_fold(0usize, |total, block| {
                block
                    .tokens()
                    .iter()
                    .map(ContigToken::max_len)
                    .try_fold(total, usize::checked_add)
                    .ok_or_else(|| ContigError::LengthOverflow {
                        block: block.to_string(),
                    })
            })
    }

        fn unmet_constraint(&self, length: usize) -> Option<UnmetConstraint> {
        let window_ok = self.length.is_none_or(|range| range.contains(length));
        let symmetry_ok = self.symmetry_order.is_none_or(|order| length % order == 0);
        match (window_ok, symmetry_ok) {
            (true, true) => None,
            (false, true) => Some(UnmetConstraint::LengthWindow),
            (true, false) => Some(UnmetConstraint::Symmetry),
            (false, false) => Some(UnmetConstraint::LengthWindowAndSymmetry),
        }
    }
}
