use scribe_store::{AccountStore, Transaction};
use scribe_types::Address;
use tracing::debug;

use crate::address::{post_address, verify_blog_address, verify_post_address};
use crate::codec;
use crate::error::ProgramResult;
use crate::ops::{load_record, require_author, store_record, OpContext};
use crate::state::{check_post_title, check_tags, Blog, Post};
use crate::update::FieldUpdate;

/// Create the next post under `blog_address` with empty content.
///
/// The post takes the blog's current `post_count` as its id and the counter
/// advances by one. Both writes land in the same transaction.
pub fn create_post<S: AccountStore + ?Sized>(
    ctx: &OpContext<'_>,
    txn: &mut Transaction<'_, S>,
    blog_address: &Address,
    title: String,
    tags: Vec<String>,
) -> ProgramResult<(u64, Address)> {
    let mut blog: Blog = load_record(ctx, txn, blog_address)?;
    verify_blog_address(ctx.program_id, &blog, blog_address)?;
    require_author(ctx.signer, &blog.author)?;

    let id = blog.post_count;
    let (address, bump) = post_address(ctx.program_id, blog_address, id)?;
    let now = ctx.clock.now();
    let post = Post {
        author: blog.author,
        blog: *blog_address,
        id,
        title,
        content: String::new(),
        tags,
        created_at: now,
        updated_at: now,
        bump,
    };
    let data = codec::encode(&post)?;
    txn.create(address, *ctx.program_id, data, ctx.signer)?;

    blog.post_count = id.saturating_add(1);
    store_record(ctx, txn, blog_address, &blog)?;

    debug!(post = %address.short_id(), id, "staged post allocation");
    Ok((id, address))
}

/// Load a post for mutation: ownership, address and author checks.
pub(crate) fn load_own_post<S: AccountStore + ?Sized>(
    ctx: &OpContext<'_>,
    txn: &mut Transaction<'_, S>,
    address: &Address,
) -> ProgramResult<Post> {
    let post: Post = load_record(ctx, txn, address)?;
    verify_post_address(ctx.program_id, &post, address)?;
    require_author(ctx.signer, &post.author)?;
    Ok(post)
}

/// Partially update a post's title and tags.
///
/// Unchanged fields keep their stored values. `updated_at` is refreshed even
/// when nothing is set. Storage is resized to the new record length.
pub fn edit_post<S: AccountStore + ?Sized>(
    ctx: &OpContext<'_>,
    txn: &mut Transaction<'_, S>,
    address: &Address,
    title: FieldUpdate<String>,
    tags: FieldUpdate<Vec<String>>,
) -> ProgramResult<Post> {
    let mut post = load_own_post(ctx, txn, address)?;

    if let FieldUpdate::SetTo(title) = title.as_set_ref() {
        check_post_title(title)?;
    }
    if let FieldUpdate::SetTo(tags) = tags.as_set_ref() {
        check_tags(tags)?;
    }
    title.apply(&mut post.title);
    tags.apply(&mut post.tags);
    post.updated_at = ctx.clock.update(&post.updated_at);

    store_record(ctx, txn, address, &post)?;
    Ok(post)
}

/// Close a post and refund its deposit to the author.
///
/// The address is retired; the post id is never handed out again.
pub fn delete_post<S: AccountStore + ?Sized>(
    ctx: &OpContext<'_>,
    txn: &mut Transaction<'_, S>,
    address: &Address,
) -> ProgramResult<u64> {
    let post = load_own_post(ctx, txn, address)?;
    let refunded = txn.close(address, &post.author)?;
    debug!(post = %address.short_id(), id = post.id, refunded, "staged post close");
    Ok(refunded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProgramError;
    use crate::limits::MAX_POST_TITLE_LEN;
    use crate::ops::initialize_blog;
    use crate::ops::testing::Harness;

    fn blog_with_author(h: &Harness) -> (Address, Address) {
        let author = h.funded_author();
        let blog = h
            .run(&author, |ctx, txn| {
                initialize_blog(ctx, txn, "My Awesome Blog".into(), "...".into())
            })
            .unwrap();
        (author, blog)
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn create_consumes_post_count() {
        let h = Harness::new();
        let (author, blog) = blog_with_author(&h);

        for expected in 0..3u64 {
            let before: Blog = h.read(&blog).unwrap();
            let (id, address) = h
                .run(&author, |ctx, txn| {
                    create_post(ctx, txn, &blog, format!("post {expected}"), vec![])
                })
                .unwrap();
            let after: Blog = h.read(&blog).unwrap();

            assert_eq!(id, before.post_count);
            assert_eq!(after.post_count, before.post_count + 1);
            let post: Post = h.read(&address).unwrap();
            assert_eq!(post.id, expected);
            assert_eq!(post.content, "");
            assert_eq!(post.created_at, post.updated_at);
            assert_eq!(post.author, author);
            assert_eq!(post.blog, blog);
        }
    }

    #[test]
    fn create_requires_blog_author() {
        let h = Harness::new();
        let (_, blog) = blog_with_author(&h);
        let intruder = h.funded_author();
        let err = h
            .run(&intruder, |ctx, txn| create_post(ctx, txn, &blog, "x".into(), vec![]))
            .unwrap_err();
        assert!(matches!(err, ProgramError::Unauthorized { .. }));
        assert_eq!(h.read::<Blog>(&blog).unwrap().post_count, 0);
    }

    #[test]
    fn create_on_missing_blog() {
        let h = Harness::new();
        let author = h.funded_author();
        let missing = Address::new([5; 32]);
        let err = h
            .run(&author, |ctx, txn| create_post(ctx, txn, &missing, "x".into(), vec![]))
            .unwrap_err();
        assert!(matches!(err, ProgramError::NotFound(a) if a == missing));
    }

    #[test]
    fn create_bounds_leave_counter_alone() {
        let h = Harness::new();
        let (author, blog) = blog_with_author(&h);

        h.run(&author, |ctx, txn| {
            create_post(ctx, txn, &blog, "a".repeat(MAX_POST_TITLE_LEN), vec![])
        })
        .unwrap();

        let err = h
            .run(&author, |ctx, txn| {
                create_post(ctx, txn, &blog, "a".repeat(MAX_POST_TITLE_LEN + 1), vec![])
            })
            .unwrap_err();
        assert!(matches!(err, ProgramError::TitleTooLong { len: 201, .. }));

        let err = h
            .run(&author, |ctx, txn| {
                create_post(ctx, txn, &blog, "t".into(), tags(&["a", "b", "c"]))
            })
            .unwrap_err();
        assert!(matches!(err, ProgramError::TooManyTags { count: 3, .. }));

        assert_eq!(h.read::<Blog>(&blog).unwrap().post_count, 1);
    }

    #[test]
    fn create_rejects_foreign_blog_address() {
        let h = Harness::new();
        let (author, blog) = blog_with_author(&h);
        let (id, post) = h
            .run(&author, |ctx, txn| create_post(ctx, txn, &blog, "t".into(), vec![]))
            .unwrap();
        assert_eq!(id, 0);
        // A post is not a blog.
        let err = h
            .run(&author, |ctx, txn| create_post(ctx, txn, &post, "t".into(), vec![]))
            .unwrap_err();
        assert!(matches!(err, ProgramError::DiscriminatorMismatch { .. }));
    }

    #[test]
    fn edit_is_partial() {
        let h = Harness::new();
        let (author, blog) = blog_with_author(&h);
        let (_, address) = h
            .run(&author, |ctx, txn| {
                create_post(ctx, txn, &blog, "My First Post".into(), tags(&["solana", "anchor"]))
            })
            .unwrap();

        let edited = h
            .run(&author, |ctx, txn| {
                edit_post(
                    ctx,
                    txn,
                    &address,
                    FieldUpdate::SetTo("Renamed".into()),
                    FieldUpdate::Unchanged,
                )
            })
            .unwrap();
        assert_eq!(edited.title, "Renamed");
        assert_eq!(edited.tags, tags(&["solana", "anchor"]));
        assert!(edited.updated_at > edited.created_at);
        assert_eq!(h.read::<Post>(&address).unwrap(), edited);

        let edited = h
            .run(&author, |ctx, txn| {
                edit_post(ctx, txn, &address, FieldUpdate::Unchanged, FieldUpdate::SetTo(vec![]))
            })
            .unwrap();
        assert_eq!(edited.title, "Renamed");
        assert!(edited.tags.is_empty());
    }

    #[test]
    fn empty_edit_still_refreshes_updated_at() {
        let h = Harness::new();
        let (author, blog) = blog_with_author(&h);
        let (_, address) = h
            .run(&author, |ctx, txn| create_post(ctx, txn, &blog, "t".into(), vec![]))
            .unwrap();
        let before: Post = h.read(&address).unwrap();

        let after = h
            .run(&author, |ctx, txn| {
                edit_post(ctx, txn, &address, FieldUpdate::Unchanged, FieldUpdate::Unchanged)
            })
            .unwrap();
        assert_eq!(after.title, before.title);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.created_at, before.created_at);
    }

    #[test]
    fn edit_by_non_author_changes_nothing() {
        let h = Harness::new();
        let (author, blog) = blog_with_author(&h);
        let (_, address) = h
            .run(&author, |ctx, txn| create_post(ctx, txn, &blog, "t".into(), vec![]))
            .unwrap();
        let before: Post = h.read(&address).unwrap();

        let intruder = h.funded_author();
        let err = h
            .run(&intruder, |ctx, txn| {
                edit_post(ctx, txn, &address, FieldUpdate::SetTo("hijacked".into()), FieldUpdate::Unchanged)
            })
            .unwrap_err();
        assert!(matches!(err, ProgramError::Unauthorized { signer, author: a } if signer == intruder && a == author));
        assert_eq!(h.read::<Post>(&address).unwrap(), before);
    }

    #[test]
    fn edit_bounds() {
        let h = Harness::new();
        let (author, blog) = blog_with_author(&h);
        let (_, address) = h
            .run(&author, |ctx, txn| create_post(ctx, txn, &blog, "t".into(), vec![]))
            .unwrap();

        h.run(&author, |ctx, txn| {
            edit_post(
                ctx,
                txn,
                &address,
                FieldUpdate::SetTo("a".repeat(MAX_POST_TITLE_LEN)),
                FieldUpdate::Unchanged,
            )
        })
        .unwrap();
        let err = h
            .run(&author, |ctx, txn| {
                edit_post(
                    ctx,
                    txn,
                    &address,
                    FieldUpdate::SetTo("a".repeat(MAX_POST_TITLE_LEN + 1)),
                    FieldUpdate::Unchanged,
                )
            })
            .unwrap_err();
        assert!(matches!(err, ProgramError::TitleTooLong { .. }));

        let err = h
            .run(&author, |ctx, txn| {
                edit_post(ctx, txn, &address, FieldUpdate::Unchanged, FieldUpdate::SetTo(tags(&["a", "b", "c"])))
            })
            .unwrap_err();
        assert!(matches!(err, ProgramError::TooManyTags { .. }));
    }

    #[test]
    fn edit_resizes_storage() {
        let h = Harness::new();
        let (author, blog) = blog_with_author(&h);
        let (_, address) = h
            .run(&author, |ctx, txn| create_post(ctx, txn, &blog, "t".into(), vec![]))
            .unwrap();
        let small = h.store.get(&address).unwrap().unwrap();

        let post = h
            .run(&author, |ctx, txn| {
                edit_post(ctx, txn, &address, FieldUpdate::SetTo("t".repeat(150)), FieldUpdate::Unchanged)
            })
            .unwrap();
        let large = h.store.get(&address).unwrap().unwrap();
        assert_eq!(large.data.len(), small.data.len() + 149);
        assert_eq!(large.data.len(), codec::encoded_len(&post).unwrap());
        assert!(large.deposit > small.deposit);
    }

    #[test]
    fn delete_refunds_and_is_terminal() {
        let h = Harness::new();
        let (author, blog) = blog_with_author(&h);
        let (_, address) = h
            .run(&author, |ctx, txn| create_post(ctx, txn, &blog, "t".into(), vec![]))
            .unwrap();
        let deposit = h.store.get(&address).unwrap().unwrap().deposit;
        let balance_before = h.store.balance(&author).unwrap();

        let refunded = h
            .run(&author, |ctx, txn| delete_post(ctx, txn, &address))
            .unwrap();
        assert_eq!(refunded, deposit);
        assert_eq!(h.store.balance(&author).unwrap(), balance_before + deposit);
        assert!(h.read::<Post>(&address).is_none());

        let err = h
            .run(&author, |ctx, txn| delete_post(ctx, txn, &address))
            .unwrap_err();
        assert!(matches!(err, ProgramError::NotFound(_)));

        // The counter keeps moving; id 0 is never reissued.
        let (id, next) = h
            .run(&author, |ctx, txn| create_post(ctx, txn, &blog, "t".into(), vec![]))
            .unwrap();
        assert_eq!(id, 1);
        assert_ne!(next, address);
    }

    #[test]
    fn delete_by_non_author_fails() {
        let h = Harness::new();
        let (author, blog) = blog_with_author(&h);
        let (_, address) = h
            .run(&author, |ctx, txn| create_post(ctx, txn, &blog, "t".into(), vec![]))
            .unwrap();
        let intruder = h.funded_author();
        let err = h
            .run(&intruder, |ctx, txn| delete_post(ctx, txn, &address))
            .unwrap_err();
        assert!(matches!(err, ProgramError::Unauthorized { .. }));
        assert!(h.read::<Post>(&address).is_some());
    }

    #[test]
    fn delete_never_created() {
        let h = Harness::new();
        let (author, blog) = blog_with_author(&h);
        let (never, _) = post_address(&h.program_id, &blog, 42).unwrap();
        let err = h
            .run(&author, |ctx, txn| delete_post(ctx, txn, &never))
            .unwrap_err();
        assert!(matches!(err, ProgramError::NotFound(_)));
    }
}
