use super::config::ConfigError;
use crate::core::contig::token::GrammarError;
use crate::core::models::residue::{ResidueRange, ResidueSpecifier};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContigError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error(
        "Receptor fragments from the same chain must be in ascending order: {previous} is followed by {next}"
    )]
    NonMonotonicFragment {
        previous: ResidueRange,
        next: ResidueRange,
    },

    #[error(
        "Fragmented receptor block '{block}' must derive from a single chain (found '{expected}' and '{found}')"
    )]
    MixedChainFragment {
        block: String,
        expected: char,
        found: char,
    },

    #[error("Contig block '{block}' can produce more positions than can be addressed")]
    LengthOverflow { block: String },

    #[error("Symmetry mismatch: {0}")]
    SymmetryMismatch(#[from] SymmetryMismatch),

    #[error("Contig string incompatible with {constraint} after {attempts} attempts")]
    UnsatisfiableConstraint {
        constraint: UnmetConstraint,
        attempts: usize,
    },

    #[error("Inconsistent secondary structure constraint: {0}")]
    InconsistentConstraint(#[from] InconsistentConstraint),

    #[error("Residue {residue} is not in the reference structure")]
    ResidueNotFound { residue: ResidueSpecifier },
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SymmetryMismatch {
    #[error("number of chains in contig must be 1 or match symmetry order {order}, found {found}")]
    ChainCount { order: usize, found: usize },
    #[error("chain {index} ('{block}') does not have the same structure as chain 0 ('{template}')")]
    Structure {
        index: usize,
        block: String,
        template: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmetConstraint {
    LengthWindow,
    Symmetry,
    LengthWindowAndSymmetry,
}

impl fmt::Display for UnmetConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnmetConstraint::LengthWindow => "length range",
            UnmetConstraint::Symmetry => "symmetry order",
            UnmetConstraint::LengthWindowAndSymmetry => "length range and symmetry order",
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum InconsistentConstraint {
    #[error("{class} residue at output position {position} is not structure-masked")]
    NotStructureMasked {
        class: &'static str,
        position: usize,
    },
    #[error("output position {position} was given multiple secondary structure assignments")]
    MultipleClasses { position: usize },
}
