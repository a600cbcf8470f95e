use scribe_types::Address;

/// Errors from account store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No live account exists at the address.
    #[error("account not found: {0}")]
    NotFound(Address),

    /// A create targeted an address that already holds an account.
    #[error("account {0} already in use")]
    AlreadyInUse(Address),

    /// A create targeted an address whose account was closed earlier.
    #[error("address {0} was closed and is retired")]
    AddressRetired(Address),

    /// An account read by the transaction changed before it committed.
    #[error("account {address} changed during the transaction")]
    Conflict { address: Address },

    /// A balance would go negative.
    #[error("insufficient funds for {holder}: needed {needed}, available {available}")]
    InsufficientFunds {
        holder: Address,
        needed: u64,
        available: u64,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the snapshot file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding ledger state was poisoned.
    #[error("ledger lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
