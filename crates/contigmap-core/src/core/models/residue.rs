use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParseResidueError {
    #[error("Residue identifier is empty")]
    Empty,
    #[error("Residue identifier '{0}' must start with an alphabetic chain label")]
    MissingChain(String),
    #[error("Residue identifier '{0}' has an invalid residue number")]
    InvalidNumber(String),
    #[error("Residue range '{0}' ends before it starts")]
    DescendingRange(String),
    #[error("Residue range '{0}' spans more residues than can be addressed")]
    SpanTooLong(String),
}

/// A residue in a structure, addressed by chain label and residue number.
///
/// Used both for reference residues (the input structure's numbering) and for
/// output identifiers (output chain label plus 1-based output residue number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueSpecifier {
    pub chain_id: char,
    pub residue_number: isize,
}

impl ResidueSpecifier {
    pub fn new(chain_id: char, residue_number: isize) -> Self {
        Self {
            chain_id,
            residue_number,
        }
    }
}

impl fmt::Display for ResidueSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.chain_id, self.residue_number)
    }
}

impl FromStr for ResidueSpecifier {
    type Err = ParseResidueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let chain_id = chars.next().ok_or(ParseResidueError::Empty)?;
        if !chain_id.is_alphabetic() {
            return Err(ParseResidueError::MissingChain(s.to_string()));
        }
        let residue_number = chars
            .as_str()
            .parse::<isize>()
            .map_err(|_| ParseResidueError::InvalidNumber(s.to_string()))?;
        Ok(Self::new(chain_id, residue_number))
    }
}

impl Serialize for ResidueSpecifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResidueSpecifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One output position's origin in reference space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueRef {
    /// Copied from this reference residue.
    Residue(ResidueSpecifier),
    /// Purely generated; no reference residue.
    Gap,
}

impl ResidueRef {
    pub fn new(chain_id: char, residue_number: isize) -> Self {
        ResidueRef::Residue(ResidueSpecifier::new(chain_id, residue_number))
    }

    pub fn is_gap(&self) -> bool {
        matches!(self, ResidueRef::Gap)
    }

    pub fn residue(&self) -> Option<&ResidueSpecifier> {
        match self {
            ResidueRef::Residue(r) => Some(r),
            ResidueRef::Gap => None,
        }
    }
}

impl From<ResidueSpecifier> for ResidueRef {
    fn from(r: ResidueSpecifier) -> Self {
        ResidueRef::Residue(r)
    }
}

impl fmt::Display for ResidueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResidueRef::Residue(r) => r.fmt(f),
            ResidueRef::Gap => f.write_str("_"),
        }
    }
}

impl FromStr for ResidueRef {
    type Err = ParseResidueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "_" => Ok(ResidueRef::Gap),
            other => other.parse().map(ResidueRef::Residue),
        }
    }
}

impl Serialize for ResidueRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResidueRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An inclusive run of residues on one chain, written `A10-25` or `A7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueRange {
    pub chain_id: char,
    pub start: isize,
    pub end: isize,
}

impl ResidueRange {
    pub fn new(chain_id: char, start: isize, end: isize) -> Self {
        Self {
            chain_id,
            start,
            end,
        }
    }

    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            self.end.abs_diff(self.start).saturating_add(1)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn residues(&self) -> impl Iterator<Item = ResidueSpecifier> + use<> {
        let chain_id = self.chain_id;
        (self.start..=self.end).map(move |n| ResidueSpecifier::new(chain_id, n))
    }

    /// Parses a separator-delimited list such as `A1-5/A10 B3-4`.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, ParseResidueError> {
        s.split(|c: char| c == '/' || c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for ResidueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}{}", self.chain_id, self.start)
        } else {
            write!(f, "{}{}-{}", self.chain_id, self.start, self.end)
        }
    }
}

impl FromStr for ResidueRange {
    type Err = ParseResidueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let chain_id = chars.next().ok_or(ParseResidueError::Empty)?;
        if !chain_id.is_alphabetic() {
            return Err(ParseResidueError::MissingChain(s.to_string()));
        }
        let body = chars.as_str();
        let parse = |n: &str| {
            n.parse::<isize>()
                .map_err(|_| ParseResidueError::InvalidNumber(s.to_string()))
        };
        let (start, end) = match body.split_once('-') {
            Some((lo, hi)) => (parse(lo)?, parse(hi)?),
            None => {
                let n = parse(body)?;
                (n, n)
            }
        };
        if end < start {
            return Err(ParseResidueError::DescendingRange(s.to_string()));
        }
        if end.checked_sub(start).and_then(|d| d.checked_add(1)).is_none() {
            return Err(ParseResidueError::SpanTooLong(s.to_string()));
        }
        Ok(Self::new(chain_id, start, end))
    }
}
