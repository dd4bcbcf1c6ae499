use thiserror::Error;

pub type Result<T> = std::result::Result<T, RevcompError>;

#[derive(Debug, Error)]
pub enum RevcompError {
    #[error("Error: Must supply at least one sequence as an argument")]
    MissingInput,

    #[error("Error: No complementary nucleotide for character {0}")]
    InvalidCharacter(char),

    #[error("Error: failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl RevcompError {
    /// process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            RevcompError::MissingInput => 1,
            RevcompError::InvalidCharacter(_) => 2,
            RevcompError::Io(_) => 3,
        }
    }
}
