use std::collections::BTreeMap;

use scribe_types::Address;

use crate::account::Account;
use crate::error::StoreResult;
use crate::rent::RentSchedule;

/// One staged account mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    /// Create or overwrite an account.
    ///
    /// `expected_version: None` means the address must be empty and not
    /// retired; `Some(v)` means the live account must still be at version `v`.
    Put {
        address: Address,
        expected_version: Option<u64>,
        account: Account,
    },
    /// Close a live account at `expected_version` and retire its address.
    Close {
        address: Address,
        expected_version: u64,
    },
    /// Retire an empty address that never held a committed account.
    Retire { address: Address },
}

/// Everything a transaction wants to commit, as a single atomic unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Versions observed by the transaction (`None` = observed absent).
    pub reads: Vec<(Address, Option<u64>)>,
    /// Account mutations, applied in order.
    pub changes: Vec<Change>,
    /// Net signed balance movement per holder.
    pub balance_deltas: BTreeMap<Address, i128>,
}

impl ChangeSet {
    /// Returns `true` if committing this set would change nothing.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.balance_deltas.values().all(|d| *d == 0)
    }
}

/// Account ledger backend.
///
/// All implementations must satisfy these invariants:
/// - [`commit`](AccountStore::commit) applies a whole [`ChangeSet`] or nothing.
/// - Every entry in `reads` and every versioned change is checked against the
///   current state; a mismatch fails the commit with `Conflict`.
/// - A closed address is retired for good.
/// - No holder balance ever goes negative.
pub trait AccountStore: Send + Sync {
    /// Read the live account at `address`, if any.
    fn get(&self, address: &Address) -> StoreResult<Option<Account>>;

    /// Returns `true` if an account at `address` was closed in the past.
    fn is_retired(&self, address: &Address) -> StoreResult<bool>;

    /// Spendable balance of a holder (authors pay deposits from it).
    fn balance(&self, holder: &Address) -> StoreResult<u64>;

    /// Add funds to a holder's balance and return the new balance.
    fn credit(&self, holder: &Address, amount: u64) -> StoreResult<u64>;

    /// The deposit schedule this ledger charges.
    fn rent(&self) -> RentSchedule;

    /// Atomically apply a change set.
    fn commit(&self, changes: ChangeSet) -> StoreResult<()>;

    /// Check whether a live account exists at `address`.
    fn exists(&self, address: &Address) -> StoreResult<bool> {
        Ok(self.get(address)?.is_some())
    }
}
