//! # Engine Module
//!
//! Turns parsed contig blocks into aligned index arrays and masks.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated construction inputs and their builder
//! - **Error Handling** ([`error`]) - The [`ContigError`](error::ContigError) taxonomy
//! - **Symmetry** ([`symmetry`]) - Chain-count checks and template replication
//! - **Sampling** ([`sampling`]) - Bounded rejection sampling of generated lengths
//! - **Expansion** ([`expansion`]) - Per-position reference, output and linear indices
//! - **Masks** ([`masks`]) - Sequence, structure and secondary structure masks
//!
//! Stages are pure functions of their inputs plus the caller's random generator, so a
//! seeded generator reproduces a mapping exactly.

pub mod config;
pub mod error;
pub mod expansion;
pub mod masks;
pub mod sampling;
pub mod symmetry;
pub(crate) mod utils;
