//! Record encoding.
//!
//! Every record is stored as `[8-byte discriminator][body]`. The
//! discriminator is the first eight bytes of the `account:<Kind>` domain
//! hash, so it stays stable for as long as the kind name does. The body is
//! bincode with fixed-width little-endian integers and `u64` length prefixes
//! on strings and sequences; trailing bytes are rejected.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;
use scribe_crypto::DomainHasher;

use crate::error::{ProgramError, ProgramResult};
use crate::limits::MAX_RECORD_LEN;

/// Length of the kind discriminator prefix.
pub const DISCRIMINATOR_LEN: usize = 8;

/// A typed record stored in an account.
pub trait Record: Serialize + DeserializeOwned {
    /// Kind name hashed into the discriminator.
    const KIND: &'static str;

    /// Check field bounds. Called before every encode.
    fn validate(&self) -> ProgramResult<()>;

    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        let hash = DomainHasher::ACCOUNT.hash(Self::KIND.as_bytes());
        let mut out = [0u8; DISCRIMINATOR_LEN];
        out.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
        out
    }
}

fn body_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit((MAX_RECORD_LEN - DISCRIMINATOR_LEN) as u64)
        .reject_trailing_bytes()
}

/// Validate and encode a record.
pub fn encode<R: Record>(record: &R) -> ProgramResult<Vec<u8>> {
    record.validate()?;
    let body = body_options()
        .serialize(record)
        .map_err(|e| ProgramError::Serialization(e.to_string()))?;

    let mut out = Vec::with_capacity(DISCRIMINATOR_LEN + body.len());
    out.extend_from_slice(&R::discriminator());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Exact number of bytes [`encode`] produces for `record`.
pub fn encoded_len<R: Record>(record: &R) -> ProgramResult<usize> {
    let body = body_options()
        .serialized_size(record)
        .map_err(|e| ProgramError::Serialization(e.to_string()))?;
    Ok(DISCRIMINATOR_LEN + body as usize)
}

/// Decode a record, checking its discriminator first.
pub fn decode<R: Record>(data: &[u8]) -> ProgramResult<R> {
    if data.is_empty() {
        return Err(ProgramError::Uninitialized);
    }
    if data.len() < DISCRIMINATOR_LEN {
        return Err(ProgramError::Corrupt(format!(
            "{} bytes is shorter than the discriminator",
            data.len()
        )));
    }

    let (found, body) = data.split_at(DISCRIMINATOR_LEN);
    if found.iter().all(|b| *b == 0) {
        return Err(ProgramError::Uninitialized);
    }
    let expected = R::discriminator();
    if found != expected.as_slice() {
        return Err(ProgramError::DiscriminatorMismatch {
            expected: hex::encode(expected),
            found: hex::encode(found),
        });
    }

    body_options()
        .deserialize(body)
        .map_err(|e| ProgramError::Corrupt(e.to_string()))
}
