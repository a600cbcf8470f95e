//! Foundation types for Scribe.
//!
//! Every other Scribe crate depends on `scribe-types`.
//!
//! # Key Types
//!
//! - [`Address`]: 32-byte ledger address (author keys and derived record addresses)
//! - [`Timestamp`]: Hybrid Logical Clock value used for `created_at` / `updated_at`

pub mod address;
pub mod error;
pub mod temporal;

pub use address::Address;
pub use error::TypeError;
pub use temporal::Timestamp;
