use std::fmt;

/// Output chain labels, assigned in this order.
pub const CHAIN_ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Returns the output chain label at `index`, or `None` once the alphabet is exhausted.
pub fn chain_label(index: usize) -> Option<char> {
    CHAIN_ALPHABET.get(index).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainRole {
    /// Copied verbatim from the reference; never counts toward the sampled length.
    Receptor,
    /// Contains generated positions (and possibly fixed motifs).
    Inpaint,
}

impl fmt::Display for ChainRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChainRole::Receptor => "receptor",
            ChainRole::Inpaint => "inpaint",
        })
    }
}
