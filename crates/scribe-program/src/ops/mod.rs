//! State transitions.
//!
//! Each operation stages its reads and writes in the caller's
//! [`Transaction`]; nothing is visible until the caller commits. Every
//! mutating operation loads its target, checks ownership and address, and
//! only then compares the signer against the stored author.

pub mod blog;
pub mod content;
pub mod post;

use scribe_store::{AccountStore, HybridLogicalClock, Transaction};
use scribe_types::Address;

use crate::codec::{self, Record};
use crate::error::{ProgramError, ProgramResult};

pub use blog::initialize_blog;
pub use content::append_content;
pub use post::{create_post, delete_post, edit_post};

/// Who is calling and with which program identity and clock.
pub struct OpContext<'a> {
    pub program_id: &'a Address,
    pub signer: &'a Address,
    pub clock: &'a HybridLogicalClock,
}

/// Load and decode the record at `address`.
pub(crate) fn load_record<R, S>(
    ctx: &OpContext<'_>,
    txn: &mut Transaction<'_, S>,
    address: &Address,
) -> ProgramResult<R>
where
    R: Record,
    S: AccountStore + ?Sized,
{
    let account = txn
        .load(address)?
        .ok_or(ProgramError::NotFound(*address))?;
    if account.owner != *ctx.program_id {
        return Err(ProgramError::IllegalOwner(*address));
    }
    codec::decode(&account.data)
}

/// Encode `record` and write it over the live account at `address`.
pub(crate) fn store_record<R, S>(
    ctx: &OpContext<'_>,
    txn: &mut Transaction<'_, S>,
    address: &Address,
    record: &R,
) -> ProgramResult<()>
where
    R: Record,
    S: AccountStore + ?Sized,
{
    let data = codec::encode(record)?;
    txn.write(address, data, ctx.signer)?;
    Ok(())
}

pub(crate) fn require_author(signer: &Address, author: &Address) -> ProgramResult<()> {
    if signer != author {
        return Err(ProgramError::Unauthorized {
            signer: *signer,
            author: *author,
        });
    }
    Ok(())
}
