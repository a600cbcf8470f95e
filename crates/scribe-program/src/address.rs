//! Blog and post addresses.
//!
//! - blog: seeds `["blog", author]`
//! - post: seeds `["post", blog, id as u64 little-endian]`
//!
//! Creation searches for the bump; every later access re-derives from the
//! bump stored in the record and rejects a caller-supplied address that
//! does not match.

use scribe_crypto::{create_program_address, find_program_address};
use scribe_types::Address;

use crate::error::{ProgramError, ProgramResult};
use crate::state::{Blog, Post};

pub const BLOG_SEED: &[u8] = b"blog";
pub const POST_SEED: &[u8] = b"post";

/// Address and bump of `author`'s blog.
pub fn blog_address(program_id: &Address, author: &Address) -> ProgramResult<(Address, u8)> {
    Ok(find_program_address(
        &[BLOG_SEED, author.as_bytes()],
        program_id,
    )?)
}

/// Address and bump of post `id` under `blog`.
pub fn post_address(program_id: &Address, blog: &Address, id: u64) -> ProgramResult<(Address, u8)> {
    Ok(find_program_address(
        &[POST_SEED, blog.as_bytes(), &id.to_le_bytes()],
        program_id,
    )?)
}

fn check(expected: Address, supplied: &Address) -> ProgramResult<()> {
    if expected != *supplied {
        return Err(ProgramError::AddressMismatch {
            expected,
            supplied: *supplied,
        });
    }
    Ok(())
}

/// Check that `supplied` is where `blog` belongs.
pub fn verify_blog_address(
    program_id: &Address,
    blog: &Blog,
    supplied: &Address,
) -> ProgramResult<()> {
    let expected = create_program_address(
        &[BLOG_SEED, blog.author.as_bytes(), &[blog.bump]],
        program_id,
    )?;
    check(expected, supplied)
}

/// Check that `supplied` is where `post` belongs.
pub fn verify_post_address(
    program_id: &Address,
    post: &Post,
    supplied: &Address,
) -> ProgramResult<()> {
    let expected = create_program_address(
        &[POST_SEED, post.blog.as_bytes(), &post.id.to_le_bytes(), &[post.bump]],
        program_id,
    )?;
    check(expected, supplied)
}
