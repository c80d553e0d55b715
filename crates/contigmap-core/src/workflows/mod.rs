//! # Workflows Module
//!
//! High-level entry points that tie the grammar, sampling and mask engine together.
//!
//! ## Overview
//!
//! A single workflow is provided: [`map::run`] takes a reference residue list, a validated
//! [`ContigMapConfig`](crate::engine::config::ContigMapConfig) and a random generator, and
//! returns a [`ContigMap`](map::ContigMap). The map can be projected into the named
//! [`Mappings`](export::Mappings) consumed by a structure-generation process.
//!
//! Every stage either succeeds or aborts the whole workflow; partially built maps are never
//! returned.

pub mod export;
pub mod map;
