use serde::{Deserialize, Serialize};
use scribe_types::Address;

/// A live account in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The program allowed to write this account's data.
    pub owner: Address,
    /// Storage deposit held by the account, returned when it is closed.
    pub deposit: u64,
    /// Raw account data. The store never interprets it.
    pub data: Vec<u8>,
    /// Incremented on every committed write; starts at 1.
    pub version: u64,
}

impl Account {
    /// Create an unversioned account; the store assigns the version on commit.
    pub fn new(owner: Address, deposit: u64, data: Vec<u8>) -> Self {
        Self {
            owner,
            deposit,
            data,
            version: 0,
        }
    }

    /// Size of the data region in bytes.
    pub fn data_len(&self) -> usize {
        self.data.len()
    }
}
