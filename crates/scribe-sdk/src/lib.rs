//! Client SDK for Scribe.
//!
//! [`BlogClient`] signs every request with the author's key, sends it
//! through a [`BlogProgram`](scribe_program::BlogProgram), and layers the
//! client-side conventions on top: content larger than one instruction is
//! uploaded as a reset followed by ordered chunks, and posts are listed by
//! scanning the blog's id range.

pub mod chunk;
pub mod client;
pub mod config;
pub mod error;

pub use chunk::chunk_content;
pub use client::BlogClient;
pub use config::ClientConfig;
pub use error::{SdkError, SdkResult};

// Re-export the types callers handle directly.
pub use scribe_crypto::SigningKey;
pub use scribe_program::{Blog, BlogProgram, FieldUpdate, Post};
pub use scribe_store::{AccountStore, InMemoryAccountStore};
pub use scribe_types::{Address, Timestamp};
