use thiserror::Error;

/// Reasons a seed phrase or its entropy is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MnemonicError {
    #[error("entropy length {0} bytes is not a non-zero multiple of 4 (max 1024)")]
    EntropyLength(usize),
    #[error("word list size {0} is not a non-zero multiple of three (max 768)")]
    Length(usize),
    #[error("word not in dictionary: {0}")]
    Word(String),
    #[error("checksum does not match")]
    Checksum,
}
