use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "scribe",
    about = "Scribe: a personal blog kept on a ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger snapshot file
    #[arg(long, global = true, default_value = "scribe-ledger.json")]
    pub ledger: PathBuf,

    /// Hex-encoded author secret key
    #[arg(long, global = true, default_value = "scribe.key")]
    pub key: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a new author key
    Keygen(KeygenArgs),
    /// Fund the author's balance for storage deposits
    Airdrop(AirdropArgs),
    /// Create your blog
    Init(InitArgs),
    /// Show a blog
    Blog(AuthorArgs),
    /// Create, edit, rewrite, show or delete posts
    Post(PostArgs),
    /// List a blog's posts, newest first
    List(AuthorArgs),
    /// Print a blog or post address
    Address(AddressArgs),
}

#[derive(Args)]
pub struct KeygenArgs {
    /// Overwrite an existing key file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct AirdropArgs {
    pub amount: u64,
}

#[derive(Args)]
pub struct InitArgs {
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub description: String,
}

#[derive(Args)]
pub struct AuthorArgs {
    /// Author address (defaults to the key's address)
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(Args)]
pub struct AddressArgs {
    #[arg(long)]
    pub author: Option<String>,
    /// Post id; prints the blog address when omitted
    #[arg(long)]
    pub id: Option<u64>,
}

#[derive(Args)]
pub struct PostArgs {
    #[command(subcommand)]
    pub action: PostAction,
}

#[derive(Args)]
pub struct ContentArgs {
    /// Inline content
    #[arg(long, conflicts_with = "file")]
    pub content: Option<String>,
    /// Read content from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum PostAction {
    /// Create a post, uploading content in chunks
    Create {
        title: String,
        #[command(flatten)]
        content: ContentArgs,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Change a post's title, tags or content
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "tag", conflicts_with = "clear_tags")]
        tags: Vec<String>,
        /// Remove all tags
        #[arg(long)]
        clear_tags: bool,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Replace a post's content
    Write {
        id: u64,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Show one post
    Show {
        id: u64,
        #[arg(long)]
        author: Option<String>,
    },
    /// Delete a post and reclaim its deposit
    Delete { id: u64 },
}
