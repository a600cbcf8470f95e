//! The Scribe blog program.
//!
//! A blog is one record per author; posts are records numbered from zero
//! under that blog. Both live at program-derived addresses in an
//! [`AccountStore`](scribe_store::AccountStore) and are mutated only by
//! their author through signed [`Instruction`]s.
//!
//! # Layout
//!
//! - [`address`] -- blog and post address derivation
//! - [`codec`] -- `[8-byte discriminator][bincode body]` record encoding
//! - [`state`] -- the [`Blog`] and [`Post`] records
//! - [`ops`] -- one function per state transition, run inside a transaction
//! - [`instruction`] -- the signed wire envelope
//! - [`processor`] -- [`BlogProgram`], which authenticates and dispatches

pub mod address;
pub mod codec;
pub mod config;
pub mod error;
pub mod instruction;
pub mod limits;
pub mod ops;
pub mod processor;
pub mod state;
pub mod update;

use scribe_types::Address;

pub use address::{blog_address, post_address};
pub use codec::Record;
pub use config::ProgramConfig;
pub use error::{ProgramError, ProgramResult};
pub use instruction::{Instruction, SignedInstruction};
pub use processor::{BlogProgram, Outcome};
pub use state::{Blog, Post};
pub use update::FieldUpdate;

const PROGRAM_LABEL: &str = "scribe-blog-program-v1";

/// Address of the blog program. Every record it writes is owned by it.
pub fn id() -> Address {
    Address::from_label(PROGRAM_LABEL)
}
