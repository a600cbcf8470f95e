use scribe_store::{AccountStore, Transaction};
use scribe_types::Address;
use tracing::debug;

use crate::address::blog_address;
use crate::codec;
use crate::error::ProgramResult;
use crate::ops::OpContext;
use crate::state::Blog;

/// Create the signer's blog. The signer becomes its author and pays for it.
///
/// A blog can be initialized once; a second call fails with `AlreadyExists`.
pub fn initialize_blog<S: AccountStore + ?Sized>(
    ctx: &OpContext<'_>,
    txn: &mut Transaction<'_, S>,
    title: String,
    description: String,
) -> ProgramResult<Address> {
    let (address, bump) = blog_address(ctx.program_id, ctx.signer)?;
    let blog = Blog {
        author: *ctx.signer,
        title,
        description,
        post_count: 0,
        bump,
    };
    let data = codec::encode(&blog)?;
    let deposit = txn.create(address, *ctx.program_id, data, ctx.signer)?;
    debug!(blog = %address.short_id(), deposit, "staged blog allocation");
    Ok(address)
}
