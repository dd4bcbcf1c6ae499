use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::{Result, RevcompError};

lazy_static! {
    /// nucleotides plus the self-complementary ambiguity codes
    pub static ref COMPLEMENT_TABLE: HashMap<char, char> = {
        let mut map = HashMap::new();
        map.insert('A', 'T');
        map.insert('T', 'A');

        map.insert('C', 'G');
        map.insert('G', 'C');

        map.insert('N', 'N');
        map.insert('-', '-');
        map.insert('W', 'W');
        map.insert('S', 'S');
        map
    };
}

/// uppercase, then strip surrounding whitespace
pub fn normalize(seq: &str) -> String {
    seq.to_ascii_uppercase().trim().to_string()
}

pub fn complement_base(base: char) -> Result<char> {
    COMPLEMENT_TABLE
        .get(&base)
        .copied()
        .ok_or(RevcompError::InvalidCharacter(base))
}

/// Reverse complement of `seq` after normalization.
///
/// Walks the normalized sequence from the last base to the first, so the
/// first base (in that order) missing from [`COMPLEMENT_TABLE`] is the one
/// reported.
pub fn reverse_complement(seq: &str) -> Result<String> {
    let seq = normalize(seq);
    let mut rc = String::with_capacity(seq.len());
    for base in seq.chars().rev() {
        rc.push(complement_base(base)?);
    }
    Ok(rc)
}
