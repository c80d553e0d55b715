use crate::core::models::residue::{ResidueRange, ResidueRef, ResidueSpecifier};
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_MAX_SAMPLING_ATTEMPTS: usize = 100_000;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error(
        "Precise mappings need the reference positions, the output positions and the linear indexing; '{0}' is missing"
    )]
    IncompletePreciseMapping(&'static str),

    #[error(
        "Precise mapping arrays differ in length (ref_idx: {ref_len}, hal_idx: {hal_len}, idx_rf: {rf_len})"
    )]
    PreciseMappingLengthMismatch {
        ref_len: usize,
        hal_len: usize,
        rf_len: usize,
    },

    #[error("Symmetry order must be a positive integer, got {0}")]
    InvalidSymmetryOrder(usize),

    #[error("Invalid length target '{0}'. Expected 'N' or 'MIN-MAX'")]
    InvalidLength(String),

    #[error("Invalid provide_seq entry '{0}'. Expected 'I' or 'I-J' (0-indexed)")]
    InvalidProvideSeq(String),

    #[error("provide_seq position {position} is outside the mapping (length {length})")]
    ProvideSeqOutOfRange { position: usize, length: usize },

    #[error("Precomputed {mask} mask has length {found}, expected {expected}")]
    MaskLengthMismatch {
        mask: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Contig needs {required} chain labels but only 26 are available")]
    ChainLabelsExhausted { required: usize },

    #[error("Maximum number of sampling attempts must be at least 1")]
    ZeroSamplingAttempts,
}

/// Accepted total inpaint length, `min <= length < max_exclusive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    pub min: usize,
    pub max_exclusive: usize,
}

impl LengthRange {
    pub fn new(min: usize, max_exclusive: usize) -> Self {
        Self { min, max_exclusive }
    }

    pub fn contains(&self, length: usize) -> bool {
        length >= self.min && length < self.max_exclusive
    }
}

impl FromStr for LengthRange {
    type Err = ConfigError;

    /// `"N"` accepts exactly N; `"LO-HI"` accepts LO through HI inclusive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidLength(s.to_string());
        let parse = |n: &str| n.trim().parse::<usize>().map_err(|_| invalid());
        let (lo, hi) = match s.split_once('-') {
            Some((lo, hi)) => (parse(lo)?, parse(hi)?),
            None => {
                let n = parse(s)?;
                (n, n)
            }
        };
        if hi < lo {
            return Err(invalid());
        }
        let max_exclusive = hi.checked_add(1).ok_or_else(invalid)?;
        Ok(Self::new(lo, max_exclusive))
    }
}

/// How a sequence or structure mask is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskSource {
    /// Reference residues whose sequence/structure is masked (to be designed).
    Residues(Vec<ResidueRange>),
    /// A finished mask, used as-is.
    Precomputed(Vec<bool>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecondaryStructureSelection {
    pub helix: Option<Vec<ResidueRange>>,
    pub strand: Option<Vec<ResidueRange>>,
    pub loop_: Option<Vec<ResidueRange>>,
}

impl SecondaryStructureSelection {
    pub fn is_empty(&self) -> bool {
        self.helix.is_none() && self.strand.is_none() && self.loop_.is_none()
    }
}

/// 0-indexed output positions whose sequence is provided (partial diffusion).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvideSeq {
    ranges: Vec<RangeInclusive<usize>>,
}

impl ProvideSeq {
    pub fn new(ranges: Vec<RangeInclusive<usize>>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &[RangeInclusive<usize>] {
        &self.ranges
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranges.iter().flat_map(|r| r.clone())
    }
}

impl FromStr for ProvideSeq {
    type Err = ConfigError;

    /// Parses comma-separated entries such as `"0-10,15,20-22"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ranges = s
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let invalid = || ConfigError::InvalidProvideSeq(entry.to_string());
                let parse = |n: &str| n.trim().parse::<usize>().map_err(|_| invalid());
                match entry.split_once('-') {
                    Some((lo, hi)) => {
                        let (lo, hi) = (parse(lo)?, parse(hi)?);
                        if hi < lo {
                            return Err(invalid());
                        }
                        Ok(lo..=hi)
                    }
                    None => parse(entry).map(|n| n..=n),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(ranges))
    }
}

/// Explicit reference/output/linear-index triple that bypasses the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreciseMapping {
    pub ref_idx: Vec<ResidueRef>,
    pub hal_idx: Vec<ResidueSpecifier>,
    pub idx_rf: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingSource {
    Contigs(String),
    Precise(PreciseMapping),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingConfig {
    pub length: Option<LengthRange>,
    pub symmetry_order: Option<usize>,
    pub max_attempts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskConfig {
    pub inpaint_seq: Option<MaskSource>,
    pub inpaint_str: Option<MaskSource>,
    pub secondary_structure: SecondaryStructureSelection,
    pub provide_seq: Option<ProvideSeq>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigMapConfig {
    pub source: MappingSource,
    pub sampling: SamplingConfig,
    pub masks: MaskConfig,
    pub topology_only: bool,
}

#[derive(Default)]
pub struct ContigMapConfigBuilder {
    contigs: Option<String>,
    ref_idx: Option<Vec<ResidueRef>>,
    hal_idx: Option<Vec<ResidueSpecifier>>,
    idx_rf: Option<Vec<usize>>,
    length: Option<LengthRange>,
    symmetry_order: Option<usize>,
    max_attempts: Option<usize>,
    inpaint_seq: Option<MaskSource>,
    inpaint_str: Option<MaskSource>,
    helix: Option<Vec<ResidueRange>>,
    strand: Option<Vec<ResidueRange>>,
    loop_: Option<Vec<ResidueRange>>,
    provide_seq: Option<ProvideSeq>,
    topology_only: bool,
}

impl ContigMapConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contigs(mut self, contigs: impl Into<String>) -> Self {
        self.contigs = Some(contigs.into());
        self
    }
    pub fn ref_idx(mut self, ref_idx: Vec<ResidueRef>) -> Self {
        self.ref_idx = Some(ref_idx);
        self
    }
    pub fn hal_idx(mut self, hal_idx: Vec<ResidueSpecifier>) -> Self {
        self.hal_idx = Some(hal_idx);
        self
    }
    pub fn idx_rf(mut self, idx_rf: Vec<usize>) -> Self {
        self.idx_rf = Some(idx_rf);
        self
    }
    pub fn length(mut self, length: LengthRange) -> Self {
        self.length = Some(length);
        self
    }
    pub fn symmetry_order(mut self, order: usize) -> Self {
        self.symmetry_order = Some(order);
        self
    }
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }
    pub fn inpaint_seq(mut self, source: MaskSource) -> Self {
        self.inpaint_seq = Some(source);
        self
    }
    pub fn inpaint_str(mut self, source: MaskSource) -> Self {
        self.inpaint_str = Some(source);
        self
    }
    pub fn helix(mut self, residues: Vec<ResidueRange>) -> Self {
        self.helix = Some(residues);
        self
    }
    pub fn strand(mut self, residues: Vec<ResidueRange>) -> Self {
        self.strand = Some(residues);
        self
    }
    pub fn loop_(mut self, residues: Vec<ResidueRange>) -> Self {
        self.loop_ = Some(residues);
        self
    }
    pub fn provide_seq(mut self, provide_seq: ProvideSeq) -> Self {
        self.provide_seq = Some(provide_seq);
        self
    }
    pub fn topology_only(mut self, topology_only: bool) -> Self {
        self.topology_only = topology_only;
        self
    }

    pub fn build(self) -> Result<ContigMapConfig, ConfigError> {
        let source = match (self.ref_idx, self.hal_idx, self.idx_rf) {
            (None, None, None) => MappingSource::Contigs(
                self.contigs
                    .ok_or(ConfigError::MissingParameter("contigs or precise mapping"))?,
            ),
            (Some(ref_idx), Some(hal_idx), Some(idx_rf)) => {
                if ref_idx.len() != hal_idx.len() || ref_idx.len() != idx_rf.len() {
                    return Err(ConfigError::PreciseMappingLengthMismatch {
                        ref_len: ref_idx.len(),
                        hal_len: hal_idx.len(),
                        rf_len: idx_rf.len(),
                    });
                }
                MappingSource::Precise(PreciseMapping {
                    ref_idx,
                    hal_idx,
                    idx_rf,
                })
            }
            (ref_idx, hal_idx, _) => {
                let missing = if ref_idx.is_none() {
                    "ref_idx"
                } else if hal_idx.is_none() {
                    "hal_idx"
                } else {
                    "idx_rf"
                };
                return Err(ConfigError::IncompletePreciseMapping(missing));
            }
        };

        if let Some(order) = self.symmetry_order {
            if order == 0 {
                return Err(ConfigError::InvalidSymmetryOrder(order));
            }
        }
        let max_attempts = self.max_attempts.unwrap_or(DEFAULT_MAX_SAMPLING_ATTEMPTS);
        if max_attempts == 0 {
            return Err(ConfigError::ZeroSamplingAttempts);
        }

        Ok(ContigMapConfig {
            source,
            sampling: SamplingConfig {
                length: self.length,
                symmetry_order: self.symmetry_order,
                max_attempts,
            },
            masks: MaskConfig {
                inpaint_seq: self.inpaint_seq,
                inpaint_str: self.inpaint_str,
                secondary_structure: SecondaryStructureSelection {
                    helix: self.helix,
                    strand: self.strand,
                    loop_: self.loop_,
                },
                provide_seq: self.provide_seq,
            },
            topology_only: self.topology_only,
        })
    }
}
