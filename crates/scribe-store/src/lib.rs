//! Account ledger for Scribe.
//!
//! This crate plays the part of the execution environment the blog program
//! runs against: a key-value ledger of owned accounts, each holding a storage
//! deposit proportional to its size.
//!
//! # Pieces
//!
//! - [`Account`] -- owner, deposit, data bytes and a version counter
//! - [`RentSchedule`] -- how large a deposit an account of a given size needs
//! - [`Transaction`] -- stages reads and writes, then commits them atomically
//! - [`AccountStore`] -- backend trait; [`InMemoryAccountStore`] implements it
//! - [`HybridLogicalClock`] -- monotonic timestamps for records
//!
//! # Design Rules
//!
//! 1. A transaction commits all of its changes or none of them.
//! 2. Every account read by a transaction is version-checked at commit; a
//!    concurrent writer makes the later commit fail with [`StoreError::Conflict`].
//! 3. Closed addresses are retired and can never hold an account again.
//! 4. Deposits move between accounts and holder balances; they are never
//!    created or destroyed except by [`AccountStore::credit`].

pub mod account;
pub mod clock;
pub mod error;
pub mod memory;
pub mod rent;
pub mod traits;
pub mod txn;

pub use account::Account;
pub use clock::HybridLogicalClock;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryAccountStore;
pub use rent::RentSchedule;
pub use traits::{AccountStore, Change, ChangeSet};
pub use txn::Transaction;
