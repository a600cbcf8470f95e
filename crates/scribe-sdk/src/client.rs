use std::sync::Arc;

use scribe_crypto::SigningKey;
use scribe_program::limits::{MAX_CONTENT_LEN, MAX_TAGS};
use scribe_program::{
    Blog, BlogProgram, Instruction, Outcome, Post, ProgramError, SignedInstruction,
};
use scribe_store::AccountStore;
use scribe_types::Address;
use tracing::debug;

use crate::chunk::chunk_content;
use crate::config::ClientConfig;
use crate::error::{SdkError, SdkResult};

/// Signs and sends blog requests for one author key.
pub struct BlogClient<S: AccountStore + ?Sized> {
    key: SigningKey,
    program: Arc<BlogProgram<S>>,
    config: ClientConfig,
}

impl<S: AccountStore + ?Sized> BlogClient<S> {
    pub fn new(key: SigningKey, program: Arc<BlogProgram<S>>) -> Self {
        Self {
            key,
            program,
            config: ClientConfig::default(),
        }
    }

    pub fn with_config(
        key: SigningKey,
        program: Arc<BlogProgram<S>>,
        config: ClientConfig,
    ) -> SdkResult<Self> {
        // The widest UTF-8 character must fit in one chunk.
        if config.chunk_size < 4 {
            return Err(SdkError::InvalidChunkSize(config.chunk_size));
        }
        // A full chunk plus its envelope must pass the program's size check.
        let envelope = SignedInstruction::sign(
            &key,
            Instruction::AppendContent {
                post: Address::zero(),
                chunk: "x".repeat(config.chunk_size),
            },
        )?
        .encoded_len()?;
        let max = program.config().max_instruction_bytes;
        if envelope > max {
            return Err(SdkError::ChunkTooLarge {
                chunk_size: config.chunk_size,
                envelope,
                max,
            });
        }
        Ok(Self {
            key,
            program,
            config,
        })
    }

    /// The signing key's address; the author of everything this client creates.
    pub fn address(&self) -> Address {
        self.key.address()
    }

    pub fn program(&self) -> &Arc<BlogProgram<S>> {
        &self.program
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn send(&self, instruction: Instruction) -> SdkResult<Outcome> {
        let envelope = SignedInstruction::sign(&self.key, instruction)?;
        Ok(self.program.process(&envelope)?)
    }

    pub fn blog_address(&self, author: &Address) -> SdkResult<Address> {
        Ok(self.program.blog_address(author)?)
    }

    pub fn post_address(&self, author: &Address, id: u64) -> SdkResult<Address> {
        let blog = self.blog_address(author)?;
        Ok(self.program.post_address(&blog, id)?)
    }

    pub fn initialize_blog(&self, title: &str, description: &str) -> SdkResult<Address> {
        let outcome = self.send(Instruction::InitializeBlog {
            title: title.to_string(),
            description: description.to_string(),
        })?;
        match outcome {
            Outcome::BlogInitialized { blog } => Ok(blog),
            _ => Err(unexpected(&outcome)),
        }
    }

    /// `author`'s blog, or `None` if they never created one.
    pub fn blog(&self, author: &Address) -> SdkResult<Option<Blog>> {
        let address = self.blog_address(author)?;
        absent_as_none(self.program.fetch_blog(&address))
    }

    /// Create a post and upload its content.
    ///
    /// The post is allocated empty; non-empty `content` is then written in
    /// chunks. If an upload chunk fails the post exists with partial
    /// content, and [`write_content`](Self::write_content) can restart it.
    pub fn create_post(
        &self,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> SdkResult<(u64, Address)> {
        check_tags(tags)?;
        check_content(content)?;

        let blog = self.blog_address(&self.address())?;
        let outcome = self.send(Instruction::CreatePost {
            blog,
            title: title.to_string(),
            tags: tags.to_vec(),
        })?;
        let Outcome::PostCreated { id, post } = outcome else {
            return Err(unexpected(&outcome));
        };

        if !content.is_empty() {
            self.upload(&post, content)?;
        }
        Ok((id, post))
    }

    /// Replace a post's content: reset, then append each chunk in order.
    pub fn write_content(&self, author: &Address, id: u64, content: &str) -> SdkResult<Post> {
        check_content(content)?;
        let post = self.post_address(author, id)?;
        self.upload(&post, content)
    }

    fn upload(&self, post: &Address, content: &str) -> SdkResult<Post> {
        let mut latest = self.append(post, "")?;
        let chunks = chunk_content(content, self.config.chunk_size);
        let total = chunks.len();
        for (index, chunk) in chunks.into_iter().enumerate() {
            latest = self.append(post, chunk)?;
            debug!(post = %post.short_id(), chunk = index + 1, total, "uploaded chunk");
        }
        Ok(latest)
    }

    fn append(&self, post: &Address, chunk: &str) -> SdkResult<Post> {
        let outcome = self.send(Instruction::AppendContent {
            post: *post,
            chunk: chunk.to_string(),
        })?;
        match outcome {
            Outcome::PostUpdated(post) => Ok(post),
            _ => Err(unexpected(&outcome)),
        }
    }

    /// Post `id` of `author`'s blog, or `None` if it was never created or
    /// has been deleted.
    pub fn post(&self, author: &Address, id: u64) -> SdkResult<Option<Post>> {
        let address = self.post_address(author, id)?;
        absent_as_none(self.program.fetch_post(&address))
    }

    /// Every live post of `author`, newest first.
    ///
    /// Scans ids `0..post_count`, skipping deleted posts.
    pub fn posts(&self, author: &Address) -> SdkResult<Vec<Post>> {
        let Some(blog) = self.blog(author)? else {
            return Ok(Vec::new());
        };
        let blog_address = self.blog_address(author)?;

        let mut posts = Vec::new();
        for id in 0..blog.post_count {
            let address = self.program.post_address(&blog_address, id)?;
            if let Some(post) = absent_as_none(self.program.fetch_post(&address))? {
                posts.push(post);
            }
        }
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    /// Update any combination of title, content and tags.
    ///
    /// Title and tags go in one edit; content is rewritten through the
    /// chunked upload. With nothing supplied nothing is sent and the stored
    /// post is returned as is.
    pub fn update_post(
        &self,
        author: &Address,
        id: u64,
        title: Option<&str>,
        content: Option<&str>,
        tags: Option<&[String]>,
    ) -> SdkResult<Post> {
        if let Some(tags) = tags {
            check_tags(tags)?;
        }
        if let Some(content) = content {
            check_content(content)?;
        }
        let address = self.post_address(author, id)?;

        if let Some(content) = content {
            if title.is_some() || tags.is_some() {
                self.edit(&address, title, tags)?;
            }
            return self.upload(&address, content);
        }
        if title.is_none() && tags.is_none() {
            return Ok(self.program.fetch_post(&address)?);
        }
        self.edit(&address, title, tags)
    }

    fn edit(
        &self,
        post: &Address,
        title: Option<&str>,
        tags: Option<&[String]>,
    ) -> SdkResult<Post> {
        let outcome = self.send(Instruction::EditPost {
            post: *post,
            title: title.map(str::to_string).into(),
            tags: tags.map(<[String]>::to_vec).into(),
        })?;
        match outcome {
            Outcome::PostUpdated(post) => Ok(post),
            _ => Err(unexpected(&outcome)),
        }
    }

    /// Delete post `id` of `author`'s blog and return the refunded deposit.
    pub fn delete_post(&self, author: &Address, id: u64) -> SdkResult<u64> {
        let address = self.post_address(author, id)?;
        match self.send(Instruction::DeletePost { post: address })? {
            Outcome::PostDeleted { refunded, .. } => Ok(refunded),
            outcome => Err(unexpected(&outcome)),
        }
    }
}

fn check_tags(tags: &[String]) -> SdkResult<()> {
    if tags.len() > MAX_TAGS {
        return Err(SdkError::TooManyTags {
            count: tags.len(),
            max: MAX_TAGS,
        });
    }
    Ok(())
}

fn check_content(content: &str) -> SdkResult<()> {
    if content.len() > MAX_CONTENT_LEN {
        return Err(SdkError::ContentTooLong {
            len: content.len(),
            max: MAX_CONTENT_LEN,
        });
    }
    Ok(())
}

fn absent_as_none<T>(result: Result<T, ProgramError>) -> SdkResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ProgramError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn unexpected(outcome: &Outcome) -> SdkError {
    SdkError::Program(ProgramError::Corrupt(format!(
        "unexpected outcome {outcome:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_program::ProgramConfig;
    use scribe_store::InMemoryAccountStore;

    fn program() -> Arc<BlogProgram<InMemoryAccountStore>> {
        Arc::new(BlogProgram::new(Arc::new(InMemoryAccountStore::new())))
    }

    fn client(program: &Arc<BlogProgram<InMemoryAccountStore>>) -> BlogClient<InMemoryAccountStore> {
        let key = SigningKey::generate();
        program
            .store()
            .credit(&key.address(), 10_000_000_000)
            .unwrap();
        BlogClient::new(key, Arc::clone(program))
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn create_post_with_content_uploads_chunks() {
        let program = program();
        let alice = client(&program);
        alice.initialize_blog("My Awesome Blog", "...").unwrap();

        let content = "0123456789".repeat(400);
        let (id, _) = alice
            .create_post("My First Post", &content, &tags(&["solana", "anchor"]))
            .unwrap();
        assert_eq!(id, 0);

        let post = alice.post(&alice.address(), 0).unwrap().unwrap();
        assert_eq!(post.content, content);
        assert_eq!(post.tags, tags(&["solana", "anchor"]));
        assert_eq!(alice.blog(&alice.address()).unwrap().unwrap().post_count, 1);
    }

    #[test]
    fn create_post_without_content_stays_unmodified() {
        let program = program();
        let alice = client(&program);
        alice.initialize_blog("b", "").unwrap();
        alice.create_post("t", "", &[]).unwrap();
        let post = alice.post(&alice.address(), 0).unwrap().unwrap();
        assert!(!post.is_modified());
    }

    #[test]
    fn client_side_limits() {
        let program = program();
        let alice = client(&program);
        alice.initialize_blog("b", "").unwrap();

        assert!(matches!(
            alice.create_post("t", "", &tags(&["a", "b", "c"])),
            Err(SdkError::TooManyTags { count: 3, max: 2 })
        ));
        assert!(matches!(
            alice.create_post("t", &"x".repeat(5001), &[]),
            Err(SdkError::ContentTooLong { len: 5001, .. })
        ));
        // Nothing was allocated.
        assert_eq!(alice.blog(&alice.address()).unwrap().unwrap().post_count, 0);
    }

    #[test]
    fn write_content_replaces() {
        let program = program();
        let alice = client(&program);
        alice.initialize_blog("b", "").unwrap();
        alice.create_post("t", &"old ".repeat(500), &[]).unwrap();

        let post = alice.write_content(&alice.address(), 0, "new").unwrap();
        assert_eq!(post.content, "new");
        let post = alice.write_content(&alice.address(), 0, "").unwrap();
        assert_eq!(post.content, "");
    }

    #[test]
    fn restart_after_partial_upload() {
        let program = program();
        let alice = client(&program);
        alice.initialize_blog("b", "").unwrap();
        let (_, address) = alice.create_post("t", "", &[]).unwrap();

        // Simulate an upload that died after two chunks.
        program
            .append_content(&alice.address(), &address, "")
            .unwrap();
        program
            .append_content(&alice.address(), &address, "first ")
            .unwrap();
        program
            .append_content(&alice.address(), &address, "second ")
            .unwrap();

        let post = alice
            .write_content(&alice.address(), 0, "first second third")
            .unwrap();
        assert_eq!(post.content, "first second third");
    }

    #[test]
    fn posts_lists_newest_first_and_skips_deleted() {
        let program = program();
        let alice = client(&program);
        alice.initialize_blog("b", "").unwrap();
        for title in ["zero", "one", "two"] {
            alice.create_post(title, "", &[]).unwrap();
        }
        alice.delete_post(&alice.address(), 1).unwrap();

        let titles: Vec<_> = alice
            .posts(&alice.address())
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["two", "zero"]);
    }

    #[test]
    fn posts_of_author_without_blog_is_empty() {
        let program = program();
        let alice = client(&program);
        assert!(alice.blog(&alice.address()).unwrap().is_none());
        assert!(alice.posts(&alice.address()).unwrap().is_empty());
    }

    #[test]
    fn update_post_combines_edit_and_upload() {
        let program = program();
        let alice = client(&program);
        alice.initialize_blog("b", "").unwrap();
        alice.create_post("t", "body", &tags(&["x"])).unwrap();

        let post = alice
            .update_post(&alice.address(), 0, Some("renamed"), Some("new body"), None)
            .unwrap();
        assert_eq!(post.title, "renamed");
        assert_eq!(post.content, "new body");
        assert_eq!(post.tags, tags(&["x"]));

        let post = alice
            .update_post(&alice.address(), 0, None, Some("only content"), None)
            .unwrap();
        assert_eq!(post.title, "renamed");
        assert_eq!(post.content, "only content");

        let tagged = alice
            .update_post(&alice.address(), 0, None, None, Some(&tags(&["y"])))
            .unwrap();
        assert_eq!(tagged.tags, tags(&["y"]));
        assert_eq!(tagged.content, "only content");
    }

    #[test]
    fn update_post_with_nothing_sends_nothing() {
        let program = program();
        let alice = client(&program);
        alice.initialize_blog("b", "").unwrap();
        alice.create_post("t", "", &[]).unwrap();
        let balance = program.store().balance(&alice.address()).unwrap();

        let post = alice
            .update_post(&alice.address(), 0, None, None, None)
            .unwrap();
        assert!(!post.is_modified());
        assert_eq!(post, alice.post(&alice.address(), 0).unwrap().unwrap());
        assert_eq!(program.store().balance(&alice.address()).unwrap(), balance);

        assert!(matches!(
            alice.update_post(&alice.address(), 9, None, None, None),
            Err(SdkError::Program(ProgramError::NotFound(_)))
        ));
    }

    #[test]
    fn other_authors_cannot_modify() {
        let program = program();
        let alice = client(&program);
        let mallory = client(&program);
        alice.initialize_blog("b", "").unwrap();
        alice.create_post("t", "", &[]).unwrap();

        let err = mallory
            .update_post(&alice.address(), 0, Some("pwned"), None, None)
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::Program(ProgramError::Unauthorized { .. })
        ));
        let err = mallory.delete_post(&alice.address(), 0).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Program(ProgramError::Unauthorized { .. })
        ));
        assert_eq!(
            alice.post(&alice.address(), 0).unwrap().unwrap().title,
            "t"
        );

        // Readers can still see it.
        assert_eq!(mallory.posts(&alice.address()).unwrap().len(), 1);
    }

    #[test]
    fn delete_twice() {
        let program = program();
        let alice = client(&program);
        alice.initialize_blog("b", "").unwrap();
        alice.create_post("t", "", &[]).unwrap();
        assert!(alice.delete_post(&alice.address(), 0).unwrap() > 0);
        assert!(alice.post(&alice.address(), 0).unwrap().is_none());
        assert!(matches!(
            alice.delete_post(&alice.address(), 0),
            Err(SdkError::Program(ProgramError::NotFound(_)))
        ));
    }

    #[test]
    fn tiny_chunk_size_is_rejected() {
        let program = program();
        let config = ClientConfig { chunk_size: 3 };
        assert!(matches!(
            BlogClient::with_config(SigningKey::generate(), program, config),
            Err(SdkError::InvalidChunkSize(3))
        ));
    }

    #[test]
    fn chunk_size_must_fit_the_instruction_limit() {
        let program = program();
        let config = ClientConfig { chunk_size: 2000 };
        let err = BlogClient::with_config(SigningKey::generate(), Arc::clone(&program), config)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            SdkError::ChunkTooLarge { chunk_size: 2000, max: 1232, envelope } if envelope > 2000
        ));
        assert!(BlogClient::with_config(
            SigningKey::generate(),
            program,
            ClientConfig::default()
        )
        .is_ok());
    }

    #[test]
    fn larger_instruction_limit_allows_larger_chunks() {
        let store = Arc::new(InMemoryAccountStore::new());
        let program = Arc::new(BlogProgram::with_config(
            store,
            ProgramConfig {
                max_instruction_bytes: 4096,
                ..ProgramConfig::default()
            },
        ));
        let key = SigningKey::generate();
        program.store().credit(&key.address(), 10_000_000_000).unwrap();
        let alice =
            BlogClient::with_config(key, Arc::clone(&program), ClientConfig { chunk_size: 2000 })
                .unwrap();
        alice.initialize_blog("b", "").unwrap();
        let content = "z".repeat(4500);
        alice.create_post("t", &content, &[]).unwrap();
        assert_eq!(
            alice.post(&alice.address(), 0).unwrap().unwrap().content,
            content
        );
    }

    #[test]
    fn small_chunks_still_assemble() {
        let program = program();
        let key = SigningKey::generate();
        program.store().credit(&key.address(), 10_000_000_000).unwrap();
        let alice =
            BlogClient::with_config(key, Arc::clone(&program), ClientConfig { chunk_size: 7 })
                .unwrap();
        alice.initialize_blog("b", "").unwrap();
        let text = "héllo wörld, ünïcode ✓";
        alice.create_post("t", text, &[]).unwrap();
        assert_eq!(
            alice.post(&alice.address(), 0).unwrap().unwrap().content,
            text
        );
    }
}
