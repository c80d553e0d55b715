//! # Contig Grammar
//!
//! Tokenizer for contig specifications such as `A1-20/5-15/A30-40/0 B1-100`.
//!
//! A specification is a whitespace-separated list of blocks, one per chain. Each block is
//! a slash-separated list of tokens:
//!
//! - `A10-25`, `A7` - reference residues kept in the output
//! - `12` - a generated stretch of fixed length
//! - `5-15` - a generated stretch whose length is sampled
//! - `0` - chain terminator
//!
//! [`block`] also holds the two classification policies applied to parsed blocks: the
//! implicit receptor terminator and the receptor/inpaint policy.

pub mod block;
pub mod token;
