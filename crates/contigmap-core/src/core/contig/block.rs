use super::token::{ContigToken, GrammarError};
use crate::core::models::chain::ChainRole;
use crate::core::models::residue::ResidueRange;
use std::fmt;
use std::str::FromStr;

/// The tokens describing one output chain (or one receptor chain).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContigBlock {
    tokens: Vec<ContigToken>,
}

impl ContigBlock {
    pub fn new(tokens: Vec<ContigToken>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[ContigToken] {
        &self.tokens
    }

    pub fn is_all_fixed_ranges(&self) -> bool {
        self.tokens.iter().all(ContigToken::is_fixed_range)
    }

    /// True when every token but the last is a reference range and the last is `0`.
    pub fn has_receptor_shape(&self) -> bool {
        match self.tokens.split_last() {
            Some((last, rest)) => {
                last.is_chain_break() && rest.iter().all(ContigToken::is_fixed_range)
            }
            None => false,
        }
    }

    /// The reference ranges of a receptor block, with its trailing `0` removed.
    ///
    /// Fails when any other token kind remains.
    pub fn receptor_fragments(&self) -> Result<Vec<ResidueRange>, GrammarError> {
        let body = match self.tokens.split_last() {
            Some((last, rest)) if last.is_chain_break() => rest,
            _ => &self.tokens[..],
        };
        body.iter()
            .map(|token| match token {
                ContigToken::FixedRange(range) => Ok(*range),
                other => Err(GrammarError::GeneratedTokenInReceptor {
                    block: self.to_string(),
                    token: other.to_string(),
                }),
            })
            .collect()
    }

    pub(crate) fn push(&mut self, token: ContigToken) {
        self.tokens.push(token);
    }
}

impl FromStr for ContigBlock {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s
            .split('/')
            .map(|part| {
                if part.is_empty() {
                    Err(GrammarError::EmptyToken {
                        block: s.to_string(),
                    })
                } else {
                    part.parse()
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(tokens))
    }
}

impl fmt::Display for ContigBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// A whitespace-separated list of contig blocks, one per chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigSpec {
    blocks: Vec<ContigBlock>,
}

impl ContigSpec {
    pub fn new(blocks: Vec<ContigBlock>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[ContigBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<ContigBlock> {
        self.blocks
    }
}

impl FromStr for ContigSpec {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let blocks = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<ContigBlock>, _>>()?;
        if blocks.is_empty() {
            return Err(GrammarError::EmptySpecification);
        }
        Ok(Self::new(blocks))
    }
}

impl fmt::Display for ContigSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{block}")?;
        }
        Ok(())
    }
}

/// Lets a receptor chain be written bare at the end of a specification.
///
/// If the last block consists only of reference ranges, a `0` terminator is appended so
/// the block takes the receptor shape.
pub fn apply_implicit_terminator(blocks: &mut [ContigBlock]) {
    if let Some(last) = blocks.last_mut() {
        if last.is_all_fixed_ranges() {
            last.push(ContigToken::ChainBreakZero);
        }
    }
}

/// Decides which blocks are receptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceptorPolicy {
    /// Receptor iff the block has the receptor shape (reference ranges then `0`).
    #[default]
    Heuristic,
    /// Topology-only mode: every block is a receptor.
    TopologyOnly,
}

impl ReceptorPolicy {
    pub fn from_topology_flag(topology_only: bool) -> Self {
        if topology_only {
            ReceptorPolicy::TopologyOnly
        } else {
            ReceptorPolicy::Heuristic
        }
    }

    pub fn is_topology_only(&self) -> bool {
        matches!(self, ReceptorPolicy::TopologyOnly)
    }

    pub fn classify(&self, block: &ContigBlock) -> ChainRole {
        match self {
            ReceptorPolicy::TopologyOnly => ChainRole::Receptor,
            ReceptorPolicy::Heuristic if block.has_receptor_shape() => ChainRole::Receptor,
            ReceptorPolicy::Heuristic => ChainRole::Inpaint,
        }
    }
}
