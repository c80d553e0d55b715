//! Provides input functionality for reference residue orderings.
//!
//! Parsing full structure files is left to the caller; this module only reads the
//! ordered `(chain, residue)` list that contig mapping consults.

pub mod pdb_idx;
