use super::error::SymmetryMismatch;
use crate::core::contig::block::{ContigBlock, apply_implicit_terminator};
use crate::core::contig::token::ContigToken;
use tracing::debug;

/// How the blocks that are sampled map onto the final chain list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainLayout {
    /// No symmetry: every block is sampled and used as-is.
    Independent { blocks: Vec<ContigBlock> },
    /// One template block, resolved once and copied `order` times.
    Replicated { template: Vec<ContigBlock>, order: usize },
    /// `order` structurally identical blocks. The first is resolved and its generated
    /// lengths are shared by every chain, which keeps its own reference ranges.
    Matched {
        template: Vec<ContigBlock>,
        chains: Vec<ContigBlock>,
    },
}

/// Token pattern with reference ranges abstracted to their lengths.
#[derive(Debug, PartialEq, Eq)]
enum Shape {
    Reference(usize),
    Token(ContigToken),
}

fn shape(block: &ContigBlock) -> Vec<Shape> {
    block
        .tokens()
        .iter()
        .map(|token| match token {
            ContigToken::FixedRange(range) => Shape::Reference(range.len()),
            other => Shape::Token(*other),
        })
        .collect()
}

impl ChainLayout {
    pub fn plan(
        mut blocks: Vec<ContigBlock>,
        symmetry_order: Option<usize>,
    ) -> Result<Self, SymmetryMismatch> {
        let Some(order) = symmetry_order else {
            apply_implicit_terminator(&mut blocks);
            return Ok(ChainLayout::Independent { blocks });
        };

        match blocks.len() {
            1 => {
                apply_implicit_terminator(&mut blocks);
                debug!(order, "Replicating single template chain.");
                Ok(ChainLayout::Replicated {
                    template: blocks,
                    order,
                })
            }
            n if n == order => {
                let reference_shape = shape(&blocks[0]);
                for (index, block) in blocks.iter().enumerate().skip(1) {
                    if shape(block) != reference_shape {
                        return Err(SymmetryMismatch::Structure {
                            index,
                            block: block.to_string(),
                            template: blocks[0].to_string(),
                        });
                    }
                }
                let mut template = vec![blocks[0].clone()];
                apply_implicit_terminator(&mut template);
                debug!(order, "Sharing sampled lengths across matched chains.");
                Ok(ChainLayout::Matched {
                    template,
                    chains: blocks,
                })
            }
            found => Err(SymmetryMismatch::ChainCount { order, found }),
        }
    }

    /// Blocks that are resolved on each sampling attempt.
    pub fn templates(&self) -> &[ContigBlock] {
        match self {
            ChainLayout::Independent { blocks } => blocks,
            ChainLayout::Replicated { template, .. } => template,
            ChainLayout::Matched { template, .. } => template,
        }
    }

    /// Builds the final chain list from the resolved templates.
    pub fn assemble(&self, resolved: Vec<ContigBlock>) -> Vec<ContigBlock> {
        match self {
            ChainLayout::Independent { .. } => resolved,
            ChainLayout::Replicated { order, .. } => (0..*order)
                .flat_map(|_| resolved.iter().cloned())
                .collect(),
            ChainLayout::Matched { chains, .. } => {
                let Some(sampled) = resolved.first() else {
                    return Vec::new();
                };
                chains
                    .iter()
                    .map(|chain| {
                        let tokens = sampled
                            .tokens()
                            .iter()
                            .enumerate()
                            .map(|(j, token)| match chain.tokens().get(j) {
                                Some(own) if own.is_fixed_range() => *own,
                                _ => *token,
                            })
                            .collect();
                        ContigBlock::new(tokens)
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(spec: &str) -> Vec<ContigBlock> {
        spec.split_whitespace().map(|b| b.parse().unwrap()).collect()
    }

    fn render(blocks: &[ContigBlock]) -> Vec<String> {
        blocks.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn no_symmetry_keeps_blocks_and_terminates_trailing_receptor() {
        let layout = ChainLayout::plan(blocks("10-20 B1-30"), None).unwrap();
        assert_eq!(render(layout.templates()), vec!["10-20", "B1-30/0"]);
        let assembled = layout.assemble(layout.templates().to_vec());
        assert_eq!(assembled.len(), 2);
    }

    #[test]
    fn single_block_is_replicated_order_times() {
        let layout = ChainLayout::plan(blocks("A1-5/10"), Some(3)).unwrap();
        assert_eq!(layout.templates().len(), 1);
        let assembled = layout.assemble(blocks("A1-5/10"));
        assert_eq!(render(&assembled), vec!["A1-5/10-10"; 3]);
    }

    #[test]
    fn chain_count_must_be_one_or_order() {
        let result = ChainLayout::plan(blocks("10 10"), Some(3));
        assert_eq!(
            result,
            Err(SymmetryMismatch::ChainCount { order: 3, found: 2 })
        );
    }

    #[test]
    fn matched_chains_must_share_structure() {
        let result = ChainLayout::plan(blocks("A1-5/10 A1-6/10"), Some(2));
        assert!(matches!(
            result,
            Err(SymmetryMismatch::Structure { index: 1, .. })
        ));

        let result = ChainLayout::plan(blocks("A1-5/10 A1-5/5-15"), Some(2));
        assert!(matches!(result, Err(SymmetryMismatch::Structure { .. })));
    }

    #[test]
    fn matched_chains_keep_their_own_reference_ranges() {
        let layout = ChainLayout::plan(blocks("A1-5/5-15 B11-15/5-15"), Some(2)).unwrap();
        assert_eq!(render(layout.templates()), vec!["A1-5/5-15"]);

        let assembled = layout.assemble(blocks("A1-5/8"));
        assert_eq!(render(&assembled), vec!["A1-5/8-8", "B11-15/8-8"]);
    }

    #[test]
    fn reference_ranges_and_fixed_lengths_are_not_interchangeable() {
        let result = ChainLayout::plan(blocks("A1-5/10 5/10"), Some(2));
        assert!(matches!(result, Err(SymmetryMismatch::Structure { .. })));
    }
}
