//! Program-derived addresses.
//!
//! A program-derived address is the BLAKE3 digest of a seed list, a one-byte
//! bump, the owning program's address and a fixed marker. A candidate is only
//! accepted when it is *not* a valid Ed25519 point: such an address has no
//! private key, so only the owning program can ever act for it.
//!
//! [`find_program_address`] searches bumps from 255 downwards and returns the
//! first viable one. Callers that already know the bump (it is stored in every
//! record) re-derive with [`create_program_address`].

use scribe_types::Address;

use crate::hasher::DomainHasher;

/// Maximum number of seeds, including the bump.
pub const MAX_SEEDS: usize = 16;
/// Maximum length of a single seed in bytes.
pub const MAX_SEED_LEN: usize = 32;

const PDA_MARKER: &[u8] = b"program-derived";

/// Errors from address derivation.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum DerivationError {
    #[error("seed list exceeds structural limits ({MAX_SEEDS} seeds of at most {MAX_SEED_LEN} bytes)")]
    MaxSeedLengthExceeded,
    #[error("seeds with this bump produce an on-curve address")]
    InvalidSeeds,
    #[error("no bump produces an off-curve address for these seeds")]
    NoViableBump,
}

/// Returns `true` if `bytes` decode to a point on the Ed25519 curve.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    ed25519_dalek::VerifyingKey::from_bytes(bytes).is_ok()
}

/// Derive the address for a complete seed list (bump included).
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<Address, DerivationError> {
    if seeds.len() > MAX_SEEDS || seeds.iter().any(|s| s.len() > MAX_SEED_LEN) {
        return Err(DerivationError::MaxSeedLengthExceeded);
    }

    let mut parts: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 2);
    parts.extend_from_slice(seeds);
    parts.push(program_id.as_bytes());
    parts.push(PDA_MARKER);

    let hash = DomainHasher::ADDRESS.hash_parts(&parts);
    if is_on_curve(&hash) {
        return Err(DerivationError::InvalidSeeds);
    }
    Ok(Address::new(hash))
}

/// Find the first viable bump (searching 255 → 0) and return the address.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), DerivationError> {
    if seeds.len() >= MAX_SEEDS || seeds.iter().any(|s| s.len() > MAX_SEED_LEN) {
        return Err(DerivationError::MaxSeedLengthExceeded);
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        with_bump.extend_from_slice(seeds);
        with_bump.push(&bump_seed);
        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(DerivationError::InvalidSeeds) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(DerivationError::NoViableBump)
}
