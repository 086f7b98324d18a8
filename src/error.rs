use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("key {0} is already present")]
    DuplicateKey(u64),
    #[error("key {0} not found")]
    KeyNotFound(u64),
    #[error("rank {rank} out of range for {len} entries")]
    RankOutOfRange { rank: usize, len: usize },
    #[error("no entry labelled {0:?}")]
    LabelNotFound(String),
}
