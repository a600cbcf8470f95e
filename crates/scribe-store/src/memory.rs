use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use scribe_types::Address;
use tracing::{debug, warn};

use crate::account::Account;
use crate::error::{StoreError, StoreResult};
use crate::rent::RentSchedule;
use crate::traits::{AccountStore, Change, ChangeSet};

/// In-memory account ledger.
///
/// All state sits behind one `RwLock`, so a commit is a single critical
/// section and trivially atomic. The ledger can be written to and restored
/// from a JSON snapshot file, which is how the CLI keeps state between runs.
pub struct InMemoryAccountStore {
    rent: RentSchedule,
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    accounts: BTreeMap<Address, Account>,
    retired: BTreeSet<Address>,
    balances: BTreeMap<Address, u64>,
}

/// On-disk form of the ledger. Maps are stored as entry lists because
/// addresses are not JSON object keys.
#[derive(Serialize, Deserialize)]
struct LedgerSnapshot {
    rent: RentSchedule,
    accounts: Vec<(Address, Account)>,
    retired: Vec<Address>,
    balances: Vec<(Address, u64)>,
}

impl InMemoryAccountStore {
    /// Create an empty ledger with the default deposit schedule.
    pub fn new() -> Self {
        Self::with_rent(RentSchedule::default())
    }

    /// Create an empty ledger with a custom deposit schedule.
    pub fn with_rent(rent: RentSchedule) -> Self {
        Self {
            rent,
            inner: RwLock::new(LedgerState::default()),
        }
    }

    /// Load a snapshot if `path` exists, otherwise start an empty ledger.
    pub fn open(path: &Path, rent: RentSchedule) -> StoreResult<Self> {
        if path.exists() {
            Self::load_snapshot(path)
        } else {
            debug!(path = %path.display(), "no ledger snapshot, starting empty");
            Ok(Self::with_rent(rent))
        }
    }

    /// Restore a ledger from a snapshot file.
    pub fn load_snapshot(path: &Path) -> StoreResult<Self> {
        let bytes = std::fs::read(path)?;
        let snapshot: LedgerSnapshot =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization(e.to_string()))?;
        debug!(
            path = %path.display(),
            accounts = snapshot.accounts.len(),
            "loaded ledger snapshot"
        );
        Ok(Self {
            rent: snapshot.rent,
            inner: RwLock::new(LedgerState {
                accounts: snapshot.accounts.into_iter().collect(),
                retired: snapshot.retired.into_iter().collect(),
                balances: snapshot.balances.into_iter().collect(),
            }),
        })
    }

    /// Write the ledger to `path`, replacing any previous snapshot atomically.
    pub fn save_snapshot(&self, path: &Path) -> StoreResult<()> {
        let snapshot = {
            let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
            LedgerSnapshot {
                rent: self.rent,
                accounts: state
                    .accounts
                    .iter()
                    .map(|(a, acc)| (*a, acc.clone()))
                    .collect(),
                retired: state.retired.iter().copied().collect(),
                balances: state.balances.iter().map(|(a, b)| (*a, *b)).collect(),
            }
        };
        let json = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %path.display(), "saved ledger snapshot");
        Ok(())
    }

    /// Number of live accounts.
    pub fn len(&self) -> usize {
        self.inner.read().map(|s| s.accounts.len()).unwrap_or(0)
    }

    /// Returns `true` if no live accounts exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted addresses of all live accounts.
    pub fn addresses(&self) -> Vec<Address> {
        self.inner
            .read()
            .map(|s| s.accounts.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Sum of all deposits held by live accounts.
    pub fn total_deposits(&self) -> u64 {
        self.inner
            .read()
            .map(|s| s.accounts.values().map(|a| a.deposit).sum())
            .unwrap_or(0)
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

fn live_version(state: &LedgerState, address: &Address) -> Option<u64> {
    state.accounts.get(address).map(|a| a.version)
}

impl AccountStore for InMemoryAccountStore {
    fn get(&self, address: &Address) -> StoreResult<Option<Account>> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.accounts.get(address).cloned())
    }

    fn is_retired(&self, address: &Address) -> StoreResult<bool> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.retired.contains(address))
    }

    fn balance(&self, holder: &Address) -> StoreResult<u64> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.balances.get(holder).copied().unwrap_or(0))
    }

    fn credit(&self, holder: &Address, amount: u64) -> StoreResult<u64> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let balance = state.balances.entry(*holder).or_insert(0);
        *balance = balance.saturating_add(amount);
        debug!(holder = %holder.short_id(), amount, balance = *balance, "credited holder");
        Ok(*balance)
    }

    fn rent(&self) -> RentSchedule {
        self.rent
    }

    fn commit(&self, set: ChangeSet) -> StoreResult<()> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;

        // Validate everything before touching state.
        for (address, observed) in &set.reads {
            if live_version(&state, address) != *observed {
                warn!(address = %address.short_id(), "stale read, rejecting commit");
                return Err(StoreError::Conflict { address: *address });
            }
        }

        for change in &set.changes {
            match change {
                Change::Put {
                    address,
                    expected_version: None,
                    ..
                }
                | Change::Retire { address } => {
                    if state.accounts.contains_key(address) {
                        return Err(StoreError::AlreadyInUse(*address));
                    }
                    if state.retired.contains(address) {
                        return Err(StoreError::AddressRetired(*address));
                    }
                }
                Change::Put {
                    address,
                    expected_version: Some(expected),
                    ..
                }
                | Change::Close {
                    address,
                    expected_version: expected,
                } => {
                    if live_version(&state, address) != Some(*expected) {
                        warn!(address = %address.short_id(), "version moved, rejecting commit");
                        return Err(StoreError::Conflict { address: *address });
                    }
                }
            }
        }

        let mut next_balances = Vec::with_capacity(set.balance_deltas.len());
        for (holder, delta) in &set.balance_deltas {
            let available = state.balances.get(holder).copied().unwrap_or(0);
            let next = available as i128 + delta;
            if next < 0 {
                return Err(StoreError::InsufficientFunds {
                    holder: *holder,
                    needed: delta.unsigned_abs() as u64,
                    available,
                });
            }
            next_balances.push((*holder, u64::try_from(next).unwrap_or(u64::MAX)));
        }

        let change_count = set.changes.len();
        for change in set.changes {
            match change {
                Change::Put {
                    address,
                    expected_version,
                    mut account,
                } => {
                    account.version = expected_version.map_or(1, |v| v + 1);
                    state.accounts.insert(address, account);
                }
                Change::Close { address, .. } | Change::Retire { address } => {
                    state.accounts.remove(&address);
                    state.retired.insert(address);
                }
            }
        }
        for (holder, balance) in next_balances {
            state.balances.insert(holder, balance);
        }

        debug!(changes = change_count, "committed change set");
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryAccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAccountStore")
            .field("account_count", &self.len())
            .field("rent", &self.rent)
            .finish()
    }
}
