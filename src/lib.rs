pub mod dna;
pub mod error;
pub mod indexed;
pub mod scheduler;

pub use dna::{reverse_complement, COMPLEMENT_TABLE};
pub use error::{Result, RevcompError};
pub use indexed::IndexedSequence;
pub use scheduler::{available_parallelism, reverse_complement_all};
