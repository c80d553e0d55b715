//! # contigmap
//!
//! Interprets contig specifications for protein-structure generation and computes the
//! index and mask contract between a reference structure and the generated output.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout:
//!
//! - **[`core`]: The Foundation.** Residue identifiers, the contig grammar
//!   (`ContigToken`, `ContigBlock`) with its terminator and receptor policies, and loading
//!   of reference residue lists.
//!
//! - **[`engine`]: The Logic Core.** Configuration, symmetry planning, rejection sampling of
//!   generated lengths, index expansion with chain-break bookkeeping, and mask construction.
//!
//! - **[`workflows`]: The Public API.** [`workflows::map::run`] builds a complete
//!   `ContigMap` and exports it as `Mappings`.

pub mod core;
pub mod engine;
pub mod workflows;
