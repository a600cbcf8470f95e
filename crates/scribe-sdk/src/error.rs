use scribe_program::ProgramError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("content is too long: {len} bytes (max {max})")]
    ContentTooLong { len: usize, max: usize },

    #[error("too many tags: {count} (max {max})")]
    TooManyTags { count: usize, max: usize },

    #[error("chunk size {0} is too small to hold a character")]
    InvalidChunkSize(usize),

    #[error("chunk size {chunk_size} needs a {envelope}-byte instruction (max {max})")]
    ChunkTooLarge {
        chunk_size: usize,
        envelope: usize,
        max: usize,
    },

    #[error("program error: {0}")]
    Program(#[from] ProgramError),
}

pub type SdkResult<T> = Result<T, SdkError>;
