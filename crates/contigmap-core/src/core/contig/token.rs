use crate::core::models::residue::ResidueRange;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GrammarError {
    #[error("Contig specification is empty")]
    EmptySpecification,
    #[error("Empty token in contig block '{block}'")]
    EmptyToken { block: String },
    #[error("Invalid contig token '{token}': {reason}")]
    InvalidToken { token: String, reason: &'static str },
    #[error("Receptor block '{block}' may only contain reference ranges, found '{token}'")]
    GeneratedTokenInReceptor { block: String, token: String },
}

/// One slash-separated element of a contig block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContigToken {
    /// Reference residues kept in the output, e.g. `A10-25` or `A7`.
    FixedRange(ResidueRange),
    /// A generated stretch of exactly `n` residues.
    FixedLength(usize),
    /// A generated stretch whose length is sampled from `lo..=hi`.
    RangedLength { lo: usize, hi: usize },
    /// The literal `0`, terminating a chain.
    ChainBreakZero,
}

impl ContigToken {
    pub fn is_fixed_range(&self) -> bool {
        matches!(self, ContigToken::FixedRange(_))
    }

    pub fn is_chain_break(&self) -> bool {
        matches!(self, ContigToken::ChainBreakZero)
    }

    /// Number of output positions this token occupies, if already determined.
    pub fn resolved_len(&self) -> Option<usize> {
        match self {
            ContigToken::FixedRange(range) => Some(range.len()),
            ContigToken::FixedLength(n) => Some(*n),
            ContigToken::RangedLength { lo, hi } if lo == hi => Some(*lo),
            ContigToken::RangedLength { .. } => None,
            ContigToken::ChainBreakZero => Some(0),
        }
    }

    /// Largest number of output positions this token can occupy once resolved.
    pub fn max_len(&self) -> usize {
        match self {
            ContigToken::RangedLength { hi, .. } => *hi,
            other => other.resolved_len().unwrap_or(0),
        }
    }
}

impl FromStr for ContigToken {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| GrammarError::InvalidToken {
            token: s.to_string(),
            reason,
        };
        let first = s.chars().next().ok_or_else(|| invalid("token is empty"))?;

        if first.is_alphabetic() {
            return s
                .parse::<ResidueRange>()
                .map(ContigToken::FixedRange)
                .map_err(|_| invalid("expected <chain><start>-<end> or <chain><residue>"));
        }
        if !first.is_ascii_digit() {
            return Err(invalid("expected a chain label or a length"));
        }

        let parse_len = |n: &str| {
            n.parse::<usize>()
                .map_err(|_| invalid("length bounds must be non-negative integers"))
        };
        if let Some((lo, hi)) = s.split_once('-') {
            let (lo, hi) = (parse_len(lo)?, parse_len(hi)?);
            if hi < lo {
                return Err(invalid("upper length bound is below the lower bound"));
            }
            return Ok(ContigToken::RangedLength { lo, hi });
        }
        if s == "0" {
            return Ok(ContigToken::ChainBreakZero);
        }
        parse_len(s).map(ContigToken::FixedLength)
    }
}

impl fmt::Display for ContigToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContigToken::FixedRange(range) => range.fmt(f),
            ContigToken::FixedLength(n) => write!(f, "{n}-{n}"),
            ContigToken::RangedLength { lo, hi } => write!(f, "{lo}-{hi}"),
            ContigToken::ChainBreakZero => f.write_str("0"),
        }
    }
}
