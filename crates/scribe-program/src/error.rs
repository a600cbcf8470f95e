use scribe_crypto::DerivationError;
use scribe_store::StoreError;
use scribe_types::Address;
use thiserror::Error;

/// Errors raised by the blog program.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("title is too long: {len} bytes (max {max})")]
    TitleTooLong { len: usize, max: usize },

    #[error("description is too long: {len} bytes (max {max})")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("content is too long: {len} bytes (max {max})")]
    ContentTooLong { len: usize, max: usize },

    #[error("too many tags: {count} (max {max})")]
    TooManyTags { count: usize, max: usize },

    #[error("signer {signer} is not the author {author}")]
    Unauthorized { signer: Address, author: Address },

    #[error("record not found at {0}")]
    NotFound(Address),

    #[error("an account already exists at {0}")]
    AlreadyExists(Address),

    #[error("discriminator mismatch: expected {expected}, found {found}")]
    DiscriminatorMismatch { expected: String, found: String },

    #[error("account data is uninitialized")]
    Uninitialized,

    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("address {supplied} does not match derived address {expected}")]
    AddressMismatch { expected: Address, supplied: Address },

    #[error("account {0} is not owned by the blog program")]
    IllegalOwner(Address),

    #[error("instruction payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("instruction signature is invalid")]
    InvalidSignature,

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("address derivation failed: {0}")]
    Derivation(#[from] DerivationError),

    #[error("ledger error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ProgramError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyInUse(address) | StoreError::AddressRetired(address) => {
                Self::AlreadyExists(address)
            }
            StoreError::NotFound(address) => Self::NotFound(address),
            other => Self::Store(other),
        }
    }
}

pub type ProgramResult<T> = Result<T, ProgramError>;
