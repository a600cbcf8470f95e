use std::sync::Arc;

use scribe_store::{AccountStore, HybridLogicalClock, Transaction};
use scribe_types::Address;
use tracing::{info, warn};

use crate::address;
use crate::codec::{self, Record};
use crate::config::ProgramConfig;
use crate::error::{ProgramError, ProgramResult};
use crate::instruction::{Instruction, SignedInstruction};
use crate::ops::{self, OpContext};
use crate::state::{Blog, Post};
use crate::update::FieldUpdate;

/// Result of a successfully processed instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    BlogInitialized { blog: Address },
    PostCreated { id: u64, post: Address },
    PostUpdated(Post),
    PostDeleted { post: Address, refunded: u64 },
}

/// The blog program bound to a ledger.
///
/// Each call runs in its own [`Transaction`] and commits all of its writes
/// or none of them.
pub struct BlogProgram<S: AccountStore + ?Sized> {
    store: Arc<S>,
    clock: HybridLogicalClock,
    config: ProgramConfig,
    program_id: Address,
}

impl<S: AccountStore + ?Sized> BlogProgram<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, ProgramConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: ProgramConfig) -> Self {
        Self {
            store,
            clock: HybridLogicalClock::new(config.node_id),
            config,
            program_id: crate::id(),
        }
    }

    pub fn program_id(&self) -> &Address {
        &self.program_id
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &ProgramConfig {
        &self.config
    }

    pub fn blog_address(&self, author: &Address) -> ProgramResult<Address> {
        Ok(address::blog_address(&self.program_id, author)?.0)
    }

    pub fn post_address(&self, blog: &Address, id: u64) -> ProgramResult<Address> {
        Ok(address::post_address(&self.program_id, blog, id)?.0)
    }

    /// Authenticate and execute a signed instruction.
    ///
    /// Rejects envelopes over `max_instruction_bytes` with `PayloadTooLarge`
    /// and bad signatures with `InvalidSignature` before touching the ledger.
    pub fn process(&self, envelope: &SignedInstruction) -> ProgramResult<Outcome> {
        let size = envelope.encoded_len()?;
        if size > self.config.max_instruction_bytes {
            warn!(size, max = self.config.max_instruction_bytes, "instruction too large");
            return Err(ProgramError::PayloadTooLarge {
                size,
                max: self.config.max_instruction_bytes,
            });
        }
        if let Err(e) = envelope.verify() {
            warn!(signer = %envelope.signer.short_id(), "rejected instruction signature");
            return Err(e);
        }

        let signer = &envelope.signer;
        match envelope.instruction.clone() {
            Instruction::InitializeBlog { title, description } => self
                .initialize_blog(signer, title, description)
                .map(|blog| Outcome::BlogInitialized { blog }),
            Instruction::CreatePost { blog, title, tags } => self
                .create_post(signer, &blog, title, tags)
                .map(|(id, post)| Outcome::PostCreated { id, post }),
            Instruction::EditPost { post, title, tags } => self
                .edit_post(signer, &post, title, tags)
                .map(Outcome::PostUpdated),
            Instruction::AppendContent { post, chunk } => self
                .append_content(signer, &post, &chunk)
                .map(Outcome::PostUpdated),
            Instruction::DeletePost { post } => self
                .delete_post(signer, &post)
                .map(|refunded| Outcome::PostDeleted { post, refunded }),
        }
    }

    pub fn initialize_blog(
        &self,
        signer: &Address,
        title: String,
        description: String,
    ) -> ProgramResult<Address> {
        let blog = self.execute("initialize_blog", signer, |ctx, txn| {
            ops::initialize_blog(ctx, txn, title, description)
        })?;
        info!(author = %signer.short_id(), blog = %blog.short_id(), "blog initialized");
        Ok(blog)
    }

    pub fn create_post(
        &self,
        signer: &Address,
        blog: &Address,
        title: String,
        tags: Vec<String>,
    ) -> ProgramResult<(u64, Address)> {
        let (id, post) = self.execute("create_post", signer, |ctx, txn| {
            ops::create_post(ctx, txn, blog, title, tags)
        })?;
        info!(blog = %blog.short_id(), id, post = %post.short_id(), "post created");
        Ok((id, post))
    }

    pub fn edit_post(
        &self,
        signer: &Address,
        post: &Address,
        title: FieldUpdate<String>,
        tags: FieldUpdate<Vec<String>>,
    ) -> ProgramResult<Post> {
        let updated = self.execute("edit_post", signer, |ctx, txn| {
            ops::edit_post(ctx, txn, post, title, tags)
        })?;
        info!(post = %post.short_id(), id = updated.id, "post edited");
        Ok(updated)
    }

    pub fn append_content(
        &self,
        signer: &Address,
        post: &Address,
        chunk: &str,
    ) -> ProgramResult<Post> {
        let updated = self.execute("append_content", signer, |ctx, txn| {
            ops::append_content(ctx, txn, post, chunk)
        })?;
        info!(
            post = %post.short_id(),
            id = updated.id,
            content_len = updated.content.len(),
            "content appended"
        );
        Ok(updated)
    }

    pub fn delete_post(&self, signer: &Address, post: &Address) -> ProgramResult<u64> {
        let refunded = self.execute("delete_post", signer, |ctx, txn| {
            ops::delete_post(ctx, txn, post)
        })?;
        info!(post = %post.short_id(), refunded, "post deleted");
        Ok(refunded)
    }

    /// Read the blog at `address`.
    pub fn fetch_blog(&self, address: &Address) -> ProgramResult<Blog> {
        self.fetch(address)
    }

    /// Read the post at `address`.
    pub fn fetch_post(&self, address: &Address) -> ProgramResult<Post> {
        self.fetch(address)
    }

    fn fetch<R: Record>(&self, address: &Address) -> ProgramResult<R> {
        let account = self
            .store
            .get(address)?
            .ok_or(ProgramError::NotFound(*address))?;
        if account.owner != self.program_id {
            return Err(ProgramError::IllegalOwner(*address));
        }
        codec::decode(&account.data)
    }

    fn execute<T>(
        &self,
        op: &'static str,
        signer: &Address,
        f: impl FnOnce(&OpContext<'_>, &mut Transaction<'_, S>) -> ProgramResult<T>,
    ) -> ProgramResult<T> {
        let ctx = OpContext {
            program_id: &self.program_id,
            signer,
            clock: &self.clock,
        };
        let mut txn = Transaction::new(self.store.as_ref());
        let result = f(&ctx, &mut txn).and_then(|out| {
            txn.commit()?;
            Ok(out)
        });
        if let Err(e) = &result {
            warn!(op, signer = %signer.short_id(), error = %e, "instruction failed");
        }
        result
    }
}

impl<S: AccountStore + ?Sized> std::fmt::Debug for BlogProgram<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogProgram")
            .field("program_id", &self.program_id)
            .field("config", &self.config)
            .finish()
    }
}
