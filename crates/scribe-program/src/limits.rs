//! Size bounds on record fields, in UTF-8 bytes.

pub const MAX_BLOG_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_POST_TITLE_LEN: usize = 200;
pub const MAX_CONTENT_LEN: usize = 5000;
pub const MAX_TAGS: usize = 2;

/// Upper bound on any encoded record, discriminator included.
pub const MAX_RECORD_LEN: usize = 10 * 1024;
