use scribe_store::{AccountStore, Transaction};
use scribe_types::Address;
use tracing::debug;

use crate::error::{ProgramError, ProgramResult};
use crate::limits::MAX_CONTENT_LEN;
use crate::ops::post::load_own_post;
use crate::ops::{store_record, OpContext};
use crate::state::Post;

/// Append `chunk` to a post's content.
///
/// An empty chunk clears the content instead. Clients rewrite a post by
/// sending `""` followed by the new content in order. Growth is paid for by
/// the author and shrinkage refunded. When the result would exceed
/// [`MAX_CONTENT_LEN`] the post is left untouched.
pub fn append_content<S: AccountStore + ?Sized>(
    ctx: &OpContext<'_>,
    txn: &mut Transaction<'_, S>,
    address: &Address,
    chunk: &str,
) -> ProgramResult<Post> {
    let mut post = load_own_post(ctx, txn, address)?;

    if chunk.is_empty() {
        post.content.clear();
    } else {
        let len = post.content.len() + chunk.len();
        if len > MAX_CONTENT_LEN {
            return Err(ProgramError::ContentTooLong {
                len,
                max: MAX_CONTENT_LEN,
            });
        }
        post.content.push_str(chunk);
    }
    post.updated_at = ctx.clock.update(&post.updated_at);

    store_record(ctx, txn, address, &post)?;
    debug!(
        post = %address.short_id(),
        appended = chunk.len(),
        total = post.content.len(),
        "staged content append"
    );
    Ok(post)
}
