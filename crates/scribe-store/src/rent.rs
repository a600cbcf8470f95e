use serde::{Deserialize, Serialize};

/// Storage deposit schedule.
///
/// An account must hold `(account_overhead + data_len) * lamports_per_byte_year
/// * exemption_years` to stay allocated. Resizing adjusts the deposit by the
/// difference; closing returns it in full.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentSchedule {
    /// Deposit units charged per byte per year.
    pub lamports_per_byte_year: u64,
    /// Years of rent an account must hold up front.
    pub exemption_years: u64,
    /// Bytes of bookkeeping charged for every account regardless of size.
    pub account_overhead: u64,
}

impl Default for RentSchedule {
    fn default() -> Self {
        Self {
            lamports_per_byte_year: 3480,
            exemption_years: 2,
            account_overhead: 128,
        }
    }
}

impl RentSchedule {
    /// A schedule that charges nothing.
    pub fn free() -> Self {
        Self {
            lamports_per_byte_year: 0,
            exemption_years: 0,
            account_overhead: 0,
        }
    }

    /// Deposit required for an account holding `data_len` bytes.
    pub fn minimum_deposit(&self, data_len: usize) -> u64 {
        self.account_overhead
            .saturating_add(data_len as u64)
            .saturating_mul(self.lamports_per_byte_year)
            .saturating_mul(self.exemption_years)
    }
}
