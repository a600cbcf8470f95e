use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use scribe_types::Address;
use tracing::debug;

use crate::account::Account;
use crate::error::{StoreError, StoreResult};
use crate::rent::RentSchedule;
use crate::traits::{AccountStore, Change, ChangeSet};

/// Per-address view held by a transaction.
#[derive(Debug)]
struct Slot {
    /// Version observed when first loaded (`None` = absent).
    observed: Option<u64>,
    /// Staged state (`None` = absent or closed).
    current: Option<Account>,
    dirty: bool,
    closed: bool,
}

/// A staged set of account reads and writes.
///
/// Nothing touches the store until [`commit`](Transaction::commit), which
/// hands the whole change set to [`AccountStore::commit`]. Dropping a
/// transaction discards it.
///
/// Deposits follow the data: creating or growing an account debits the payer
/// by the extra deposit the [`RentSchedule`] requires, shrinking refunds the
/// payer, and closing refunds the full deposit to the recipient.
pub struct Transaction<'s, S: AccountStore + ?Sized> {
    store: &'s S,
    rent: RentSchedule,
    slots: BTreeMap<Address, Slot>,
    balance_deltas: BTreeMap<Address, i128>,
}

impl<'s, S: AccountStore + ?Sized> Transaction<'s, S> {
    /// Start a transaction against `store`.
    pub fn new(store: &'s S) -> Self {
        Self {
            rent: store.rent(),
            store,
            slots: BTreeMap::new(),
            balance_deltas: BTreeMap::new(),
        }
    }

    fn slot(&mut self, address: &Address) -> StoreResult<&mut Slot> {
        match self.slots.entry(*address) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let current = self.store.get(address)?;
                Ok(entry.insert(Slot {
                    observed: current.as_ref().map(|a| a.version),
                    current,
                    dirty: false,
                    closed: false,
                }))
            }
        }
    }

    fn adjust(&mut self, holder: &Address, delta: i128) {
        if delta != 0 {
            *self.balance_deltas.entry(*holder).or_insert(0) += delta;
        }
    }

    /// Read the account at `address` as this transaction currently sees it.
    pub fn load(&mut self, address: &Address) -> StoreResult<Option<Account>> {
        Ok(self.slot(address)?.current.clone())
    }

    /// Allocate a new account holding `data`, paid for by `payer`.
    ///
    /// Returns the deposit charged.
    pub fn create(
        &mut self,
        address: Address,
        owner: Address,
        data: Vec<u8>,
        payer: &Address,
    ) -> StoreResult<u64> {
        let retired = self.store.is_retired(&address)?;
        let deposit = self.rent.minimum_deposit(data.len());

        let slot = self.slot(&address)?;
        if slot.current.is_some() {
            return Err(StoreError::AlreadyInUse(address));
        }
        if retired || slot.closed {
            return Err(StoreError::AddressRetired(address));
        }
        slot.current = Some(Account::new(owner, deposit, data));
        slot.dirty = true;

        self.adjust(payer, -(deposit as i128));
        Ok(deposit)
    }

    /// Replace the data of a live account, resizing its deposit to match.
    ///
    /// Growth is charged to `payer`; shrinkage is refunded to `payer`.
    pub fn write(&mut self, address: &Address, data: Vec<u8>, payer: &Address) -> StoreResult<()> {
        let required = self.rent.minimum_deposit(data.len());

        let slot = self.slot(address)?;
        let account = slot
            .current
            .as_mut()
            .ok_or(StoreError::NotFound(*address))?;
        let delta = required as i128 - account.deposit as i128;
        account.deposit = required;
        account.data = data;
        slot.dirty = true;

        self.adjust(payer, -delta);
        Ok(())
    }

    /// Close a live account and refund its deposit to `recipient`.
    ///
    /// Returns the refunded amount.
    pub fn close(&mut self, address: &Address, recipient: &Address) -> StoreResult<u64> {
        let slot = self.slot(address)?;
        let account = slot.current.take().ok_or(StoreError::NotFound(*address))?;
        slot.closed = true;
        slot.dirty = true;

        self.adjust(recipient, account.deposit as i128);
        Ok(account.deposit)
    }

    /// Build the change set without committing it.
    pub fn into_change_set(self) -> ChangeSet {
        let mut set = ChangeSet {
            balance_deltas: self.balance_deltas,
            ..ChangeSet::default()
        };

        for (address, slot) in self.slots {
            set.reads.push((address, slot.observed));
            if !slot.dirty {
                continue;
            }
            match (slot.current, slot.observed) {
                (Some(account), expected_version) => set.changes.push(Change::Put {
                    address,
                    expected_version,
                    account,
                }),
                (None, Some(expected_version)) if slot.closed => set.changes.push(Change::Close {
                    address,
                    expected_version,
                }),
                // Created and closed inside the same transaction.
                (None, None) if slot.closed => set.changes.push(Change::Retire { address }),
                (None, _) => {}
            }
        }
        set
    }

    /// Commit every staged change atomically.
    pub fn commit(self) -> StoreResult<()> {
        let store = self.store;
        let set = self.into_change_set();
        debug!(
            reads = set.reads.len(),
            changes = set.changes.len(),
            "committing transaction"
        );
        store.commit(set)
    }
}
