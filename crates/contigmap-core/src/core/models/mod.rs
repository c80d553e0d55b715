//! # Core Models Module
//!
//! Data structures shared by every stage of contig mapping: residue identifiers in
//! reference and output space, output chain labelling, and the read-only view of the
//! reference structure's residue ordering.
//!
//! ## Key Components
//!
//! - [`residue`] - `ResidueSpecifier`, the `ResidueRef` origin of an output position
//!   (with its explicit `Gap` variant) and inclusive `ResidueRange` selections
//! - [`chain`] - Output chain alphabet and block roles (receptor or inpaint)
//! - [`reference`] - The `ReferenceResidues` lookup seam and its `PdbIndex` implementation
//!
//! ## Usage
//!
//! ```ignore
//! use contigmap::core::models::reference::{PdbIndex, ReferenceResidues};
//! use contigmap::core::models::residue::ResidueSpecifier;
//!
//! let index: PdbIndex = (1..=50).map(|n| ResidueSpecifier::new('A', n)).collect();
//! assert_eq!(index.position(&ResidueSpecifier::new('A', 10)), Some(9));
//! ```

pub mod chain;
pub mod reference;
pub mod residue;
