use crate::{dna::reverse_complement, error::Result};

/// A sequence tagged with its 0-based position in the input, so results
/// coming back out of order can be put back in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedSequence {
    index: usize,
    seq: String,
}

impl IndexedSequence {
    pub fn new(index: usize, seq: String) -> Self {
        Self { index, seq }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn seq(&self) -> &str {
        &self.seq
    }

    /// `seq` is left untouched on error
    pub fn reverse_complement_in_place(&mut self) -> Result<()> {
        self.seq = reverse_complement(&self.seq)?;
        Ok(())
    }
}
