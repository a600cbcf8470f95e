use std::fmt;

use serde::{Deserialize, Serialize};

/// Hybrid Logical Clock timestamp stamped on records.
///
/// Two timestamps issued by the ledger clock for the same record always
/// compare strictly increasing, even within one millisecond, which keeps a
/// post's `updated_at` moving forward on every mutation.
///
/// Field order is the comparison order, so `Ord` is derived.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Milliseconds since the UNIX epoch.
    pub physical_ms: u64,
    /// Breaks ties inside one millisecond.
    pub logical: u32,
    /// Issuing ledger node; last-resort tie breaker.
    pub node_id: u16,
}

impl Timestamp {
    pub fn new(physical_ms: u64, logical: u32, node_id: u16) -> Self {
        Self {
            physical_ms,
            logical,
            node_id,
        }
    }

    /// Earlier than anything the clock can issue.
    pub const fn zero() -> Self {
        Self {
            physical_ms: 0,
            logical: 0,
            node_id: 0,
        }
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timestamp({}ms.{}.n{})",
            self.physical_ms, self.logical, self.node_id
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.n{}", self.physical_ms, self.logical, self.node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_millisecond_wins_over_counter() {
        let created = Timestamp::new(1_700_000_000_000, 9, 3);
        let edited = Timestamp::new(1_700_000_000_001, 0, 0);
        assert!(created < edited);
    }

    #[test]
    fn counter_orders_within_a_millisecond() {
        let appended = Timestamp::new(500, 1, 7);
        let reset = Timestamp::new(500, 2, 0);
        assert!(appended < reset);
    }

    #[test]
    fn node_breaks_exact_ties() {
        let mut stamps = vec![
            Timestamp::new(500, 1, 2),
            Timestamp::zero(),
            Timestamp::new(500, 1, 1),
        ];
        stamps.sort();
        assert_eq!(
            stamps,
            vec![Timestamp::zero(), Timestamp::new(500, 1, 1), Timestamp::new(500, 1, 2)]
        );
    }

    #[test]
    fn text_forms() {
        let ts = Timestamp::new(1000, 5, 3);
        assert_eq!(ts.to_string(), "1000.5.n3");
        assert_eq!(format!("{ts:?}"), "Timestamp(1000ms.5.n3)");
    }
}
