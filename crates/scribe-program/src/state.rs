use serde::{Deserialize, Serialize};
use scribe_types::{Address, Timestamp};

use crate::codec::Record;
use crate::error::{ProgramError, ProgramResult};
use crate::limits::{
    MAX_BLOG_TITLE_LEN, MAX_CONTENT_LEN, MAX_DESCRIPTION_LEN, MAX_POST_TITLE_LEN, MAX_TAGS,
};

/// An author's blog. One per author, created once and never deleted.
///
/// Field order is part of the stored layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub author: Address,
    pub title: String,
    pub description: String,
    /// Next post id to hand out. Never decremented, so it counts posts ever
    /// created rather than posts currently live.
    pub post_count: u64,
    pub bump: u8,
}

/// A single post under a blog.
///
/// Field order is part of the stored layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub author: Address,
    pub blog: Address,
    pub id: u64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub bump: u8,
}

impl Post {
    /// Returns `true` if any mutation happened since creation.
    pub fn is_modified(&self) -> bool {
        self.updated_at != self.created_at
    }
}

fn check_len(value: &str, max: usize, err: fn(usize, usize) -> ProgramError) -> ProgramResult<()> {
    if value.len() > max {
        return Err(err(value.len(), max));
    }
    Ok(())
}

pub(crate) fn check_post_title(title: &str) -> ProgramResult<()> {
    check_len(title, MAX_POST_TITLE_LEN, |len, max| ProgramError::TitleTooLong {
        len,
        max,
    })
}

pub(crate) fn check_tags(tags: &[String]) -> ProgramResult<()> {
    if tags.len() > MAX_TAGS {
        return Err(ProgramError::TooManyTags {
            count: tags.len(),
            max: MAX_TAGS,
        });
    }
    Ok(())
}

impl Record for Blog {
    const KIND: &'static str = "Blog";

    fn validate(&self) -> ProgramResult<()> {
        check_len(&self.title, MAX_BLOG_TITLE_LEN, |len, max| {
            ProgramError::TitleTooLong { len, max }
        })?;
        check_len(&self.description, MAX_DESCRIPTION_LEN, |len, max| {
            ProgramError::DescriptionTooLong { len, max }
        })
    }
}

impl Record for Post {
    const KIND: &'static str = "Post";

    fn validate(&self) -> ProgramResult<()> {
        check_post_title(&self.title)?;
        check_len(&self.content, MAX_CONTENT_LEN, |len, max| {
            ProgramError::ContentTooLong { len, max }
        })?;
        check_tags(&self.tags)
    }
}
