//! Cryptographic primitives for Scribe.
//!
//! Provides domain-separated BLAKE3 hashing, Ed25519 signing/verification,
//! and program-derived address search.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod derive;
pub mod hasher;
pub mod signer;

pub use derive::{
    create_program_address, find_program_address, is_on_curve, DerivationError, MAX_SEEDS,
    MAX_SEED_LEN,
};
pub use hasher::DomainHasher;
pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
