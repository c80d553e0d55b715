//! # Core Module
//!
//! Stateless building blocks for contig mapping: the residue and chain data model, the
//! contig grammar, and reading the reference residue ordering.
//!
//! ## Architecture
//!
//! - **Data Model** ([`models`]) - Residue identifiers, the `Gap` origin, chain labels and
//!   the reference residue lookup seam
//! - **Grammar** ([`contig`]) - Tokens, blocks, and the receptor classification policies
//! - **Input** ([`io`]) - Loading a reference residue ordering from CSV
//!
//! Nothing in this module samples, allocates chain breaks, or builds masks; those stages
//! live in [`crate::engine`].

pub mod contig;
pub mod io;
pub mod models;
