//! Utility functions for the engine module.
//!
//! Holds the bounded retry combinator used by rejection sampling.

pub mod retry;
