use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use scribe_types::Timestamp;

struct ClockState {
    physical_ms: u64,
    logical: u32,
}

/// Hybrid Logical Clock used to stamp records.
///
/// - **Local event** (`now`): `physical = max(wall, last)`; the logical
///   counter resets when physical advances and increments otherwise.
/// - **Successor** (`update`): the result is strictly greater than both the
///   clock's last value and the given timestamp, even if the wall clock went
///   backwards or the given timestamp came from another node.
///
/// Safe to share across threads.
pub struct HybridLogicalClock {
    node_id: u16,
    state: Mutex<ClockState>,
}

impl HybridLogicalClock {
    pub fn new(node_id: u16) -> Self {
        Self {
            node_id,
            state: Mutex::new(ClockState {
                physical_ms: 0,
                logical: 0,
            }),
        }
    }

    /// Issue a timestamp strictly greater than every earlier one from this clock.
    pub fn now(&self) -> Timestamp {
        let wall = Self::wall_clock_ms();
        let mut state = self.lock();

        let physical = wall.max(state.physical_ms);
        if physical > state.physical_ms {
            state.physical_ms = physical;
            state.logical = 0;
        } else {
            let base = state.logical;
            Self::bump(&mut state, base);
        }

        Timestamp::new(state.physical_ms, state.logical, self.node_id)
    }

    /// Issue a timestamp strictly greater than both this clock's state and
    /// `previous`.
    pub fn update(&self, previous: &Timestamp) -> Timestamp {
        let wall = Self::wall_clock_ms();
        let mut state = self.lock();

        let physical = wall.max(state.physical_ms).max(previous.physical_ms);
        if physical > state.physical_ms && physical > previous.physical_ms {
            state.physical_ms = physical;
            state.logical = 0;
        } else {
            let base = match (
                physical == state.physical_ms,
                physical == previous.physical_ms,
            ) {
                (true, true) => state.logical.max(previous.logical),
                (true, false) => state.logical,
                _ => previous.logical,
            };
            state.physical_ms = physical;
            Self::bump(&mut state, base);
        }

        let next = Timestamp::new(state.physical_ms, state.logical, self.node_id);
        // Same physical and logical but a higher node id on `previous`.
        if next <= *previous {
            let base = state.logical;
            Self::bump(&mut state, base);
            return Timestamp::new(state.physical_ms, state.logical, self.node_id);
        }
        next
    }

    /// Advance the logical counter past `base`, carrying into physical on overflow.
    fn bump(state: &mut ClockState, base: u32) {
        match base.checked_add(1) {
            Some(logical) => state.logical = logical,
            None => {
                state.physical_ms = state.physical_ms.saturating_add(1);
                state.logical = 0;
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn wall_clock_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

impl Default for HybridLogicalClock {
    fn default() -> Self {
        Self::new(0)
    }
}
