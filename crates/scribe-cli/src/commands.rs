use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::{json, Value};
use scribe_crypto::SigningKey;
use scribe_program::{Blog, BlogProgram, Post};
use scribe_sdk::{BlogClient, ClientConfig};
use scribe_store::{AccountStore, InMemoryAccountStore};
use scribe_types::{Address, Timestamp};

use crate::cli::*;
use crate::config::CliConfig;

type Store = InMemoryAccountStore;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let out = Output(cli.format.clone());
    let session = || Session::open(&cli.ledger, &cli.key, &config);

    match cli.command {
        Command::Keygen(args) => cmd_keygen(&cli.key, &args, &out),
        Command::Airdrop(args) => session()?.run(|s| cmd_airdrop(s, args, &out)),
        Command::Init(args) => session()?.run(|s| cmd_init(s, args, &out)),
        Command::Blog(args) => session()?.run(|s| cmd_blog(s, args, &out)),
        Command::Post(args) => {
            let session = session()?;
            match args.action {
                PostAction::Create { title, content, tags } => {
                    session.run(|s| cmd_post_create(s, title, content, tags, &out))
                }
                PostAction::Edit {
                    id,
                    title,
                    tags,
                    clear_tags,
                    content,
                } => session.run(|s| {
                    cmd_post_edit(s, id, title, tags, clear_tags, content, &out)
                }),
                PostAction::Write { id, content } => {
                    session.run(|s| cmd_post_write(s, id, content, &out))
                }
                PostAction::Show { id, author } => {
                    session.run(|s| cmd_post_show(s, id, author, &out))
                }
                PostAction::Delete { id } => session.run(|s| cmd_post_delete(s, id, &out)),
            }
        }
        Command::List(args) => session()?.run(|s| cmd_list(s, args, &out)),
        Command::Address(args) => session()?.run(|s| cmd_address(s, args, &out)),
    }
}

/// Ledger and program state for one CLI invocation.
struct Session {
    store: Arc<Store>,
    program: Arc<BlogProgram<Store>>,
    client_config: ClientConfig,
    ledger_path: PathBuf,
    key_path: PathBuf,
}

impl Session {
    fn open(ledger_path: &Path, key_path: &Path, config: &CliConfig) -> anyhow::Result<Self> {
        let store = Arc::new(
            InMemoryAccountStore::open(ledger_path, config.rent)
                .with_context(|| format!("opening ledger {}", ledger_path.display()))?,
        );
        let program = Arc::new(BlogProgram::with_config(
            Arc::clone(&store),
            config.program.clone(),
        ));
        Ok(Self {
            store,
            program,
            client_config: config.client.clone(),
            ledger_path: ledger_path.to_path_buf(),
            key_path: key_path.to_path_buf(),
        })
    }

    fn key(&self) -> anyhow::Result<SigningKey> {
        let text = std::fs::read_to_string(&self.key_path).with_context(|| {
            format!(
                "reading key {} (run `scribe keygen` first)",
                self.key_path.display()
            )
        })?;
        SigningKey::from_hex(&text)
            .with_context(|| format!("parsing key {}", self.key_path.display()))
    }

    /// A client that signs with the author key.
    fn signer(&self) -> anyhow::Result<BlogClient<Store>> {
        Ok(BlogClient::with_config(
            self.key()?,
            Arc::clone(&self.program),
            self.client_config.clone(),
        )?)
    }

    /// A client for reads. Reads never sign, so any key will do.
    fn reader(&self) -> anyhow::Result<BlogClient<Store>> {
        let key = if self.key_path.exists() {
            self.key()?
        } else {
            SigningKey::generate()
        };
        Ok(BlogClient::with_config(
            key,
            Arc::clone(&self.program),
            self.client_config.clone(),
        )?)
    }

    fn author(&self, explicit: Option<&str>) -> anyhow::Result<Address> {
        match explicit {
            Some(hex) => Address::from_hex(hex).with_context(|| format!("bad author {hex}")),
            None => Ok(self.key()?.address()),
        }
    }

    /// Run one command, then persist the ledger.
    ///
    /// The ledger is saved even when the command fails: a multi-step command
    /// such as a chunked upload may have committed some steps already.
    fn run(&self, command: impl FnOnce(&Self) -> anyhow::Result<()>) -> anyhow::Result<()> {
        let result = command(self);
        let saved = self.save();
        result.and(saved)
    }

    fn save(&self) -> anyhow::Result<()> {
        self.store
            .save_snapshot(&self.ledger_path)
            .with_context(|| format!("saving ledger {}", self.ledger_path.display()))
    }
}

struct Output(OutputFormat);

impl Output {
    /// Print `value` as JSON, or run `text` for the human format.
    fn emit(&self, value: Value, text: impl FnOnce()) -> anyhow::Result<()> {
        match self.0 {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
            OutputFormat::Text => text(),
        }
        Ok(())
    }
}

fn read_content(args: ContentArgs) -> anyhow::Result<Option<String>> {
    match (args.content, args.file) {
        (Some(text), _) => Ok(Some(text)),
        (None, Some(path)) => std::fs::read_to_string(&path)
            .map(Some)
            .with_context(|| format!("reading {}", path.display())),
        (None, None) => Ok(None),
    }
}

fn format_time(ts: &Timestamp) -> String {
    chrono::DateTime::from_timestamp_millis(ts.physical_ms as i64)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn blog_json(address: &Address, blog: &Blog) -> Value {
    json!({
        "address": address.to_hex(),
        "author": blog.author.to_hex(),
        "title": blog.title,
        "description": blog.description,
        "post_count": blog.post_count,
    })
}

fn post_json(address: &Address, post: &Post) -> Value {
    json!({
        "address": address.to_hex(),
        "id": post.id,
        "author": post.author.to_hex(),
        "blog": post.blog.to_hex(),
        "title": post.title,
        "content": post.content,
        "tags": post.tags,
        "created_at": format_time(&post.created_at),
        "updated_at": format_time(&post.updated_at),
    })
}

fn print_post_summary(post: &Post) {
    let tags = if post.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", post.tags.join(", "))
    };
    println!(
        "{} {}{}  {}",
        format!("#{}", post.id).yellow().bold(),
        post.title.bold(),
        tags.cyan(),
        format_time(&post.created_at).dimmed()
    );
}

fn cmd_keygen(path: &Path, args: &KeygenArgs, out: &Output) -> anyhow::Result<()> {
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to replace it)", path.display());
    }
    let key = SigningKey::generate();
    std::fs::write(path, key.to_hex()).with_context(|| format!("writing {}", path.display()))?;
    let address = key.address();
    out.emit(
        json!({ "address": address.to_hex(), "key_file": path.display().to_string() }),
        || {
            println!("{} Generated key {}", "✓".green().bold(), path.display());
            println!("  Address: {}", address.to_hex().cyan());
        },
    )
}

fn cmd_airdrop(session: &Session, args: AirdropArgs, out: &Output) -> anyhow::Result<()> {
    let holder = session.key()?.address();
    let balance = session.store.credit(&holder, args.amount)?;
    out.emit(json!({ "address": holder.to_hex(), "balance": balance }), || {
        println!(
            "{} Credited {} to {}",
            "✓".green().bold(),
            args.amount,
            holder.short_id().cyan()
        );
        println!("  Balance: {}", balance.to_string().bold());
    })
}

fn cmd_init(session: &Session, args: InitArgs, out: &Output) -> anyhow::Result<()> {
    let client = session.signer()?;
    let address = client.initialize_blog(&args.title, &args.description)?;
    out.emit(json!({ "blog": address.to_hex() }), || {
        println!("{} Initialized blog {}", "✓".green().bold(), args.title.bold());
        println!("  Address: {}", address.to_hex().cyan());
    })
}

fn cmd_blog(session: &Session, args: AuthorArgs, out: &Output) -> anyhow::Result<()> {
    let author = session.author(args.author.as_deref())?;
    let client = session.reader()?;
    let address = client.blog_address(&author)?;
    let Some(blog) = client.blog(&author)? else {
        bail!("no blog for author {}", author.short_id());
    };
    let balance = session.store.balance(&author)?;
    let mut value = blog_json(&address, &blog);
    value["author_balance"] = json!(balance);
    out.emit(value, || {
        println!("{}", blog.title.bold());
        if !blog.description.is_empty() {
            println!("{}", blog.description);
        }
        println!("  Address: {}", address.to_hex().cyan());
        println!("  Author:  {}", blog.author.to_hex());
        println!("  Posts created: {}", blog.post_count);
        println!("  Author balance: {balance}");
    })
}

fn cmd_post_create(
    session: &Session,
    title: String,
    content: ContentArgs,
    tags: Vec<String>,
    out: &Output,
) -> anyhow::Result<()> {
    let content = read_content(content)?.unwrap_or_default();
    let client = session.signer()?;
    let (id, address) = client.create_post(&title, &content, &tags)?;
    out.emit(
        json!({ "id": id, "address": address.to_hex(), "content_len": content.len() }),
        || {
            println!("{} Created post #{} {}", "✓".green().bold(), id, title.bold());
            println!("  Address: {}", address.to_hex().cyan());
            if !content.is_empty() {
                println!("  Content: {} bytes", content.len());
            }
        },
    )
}

fn cmd_post_edit(
    session: &Session,
    id: u64,
    title: Option<String>,
    tags: Vec<String>,
    clear_tags: bool,
    content: ContentArgs,
    out: &Output,
) -> anyhow::Result<()> {
    let content = read_content(content)?;
    let tags = if clear_tags || !tags.is_empty() {
        Some(tags)
    } else {
        None
    };
    let client = session.signer()?;
    let author = client.address();
    let post = client.update_post(
        &author,
        id,
        title.as_deref(),
        content.as_deref(),
        tags.as_deref(),
    )?;
    let address = client.post_address(&author, id)?;
    out.emit(post_json(&address, &post), || {
        println!("{} Updated post", "✓".green().bold());
        print_post_summary(&post);
    })
}

fn cmd_post_write(
    session: &Session,
    id: u64,
    content: ContentArgs,
    out: &Output,
) -> anyhow::Result<()> {
    let Some(content) = read_content(content)? else {
        bail!("nothing to write: pass --content or --file");
    };
    let client = session.signer()?;
    let author = client.address();
    let post = client.write_content(&author, id, &content)?;
    out.emit(json!({ "id": id, "content_len": post.content.len() }), || {
        println!(
            "{} Wrote {} bytes to post #{}",
            "✓".green().bold(),
            post.content.len(),
            id
        );
    })
}

fn cmd_post_show(
    session: &Session,
    id: u64,
    author: Option<String>,
    out: &Output,
) -> anyhow::Result<()> {
    let author = session.author(author.as_deref())?;
    let client = session.reader()?;
    let address = client.post_address(&author, id)?;
    let Some(post) = client.post(&author, id)? else {
        bail!("post #{id} not found");
    };
    out.emit(post_json(&address, &post), || {
        print_post_summary(&post);
        if post.is_modified() {
            println!("  {}", format!("updated {}", format_time(&post.updated_at)).dimmed());
        }
        println!();
        println!("{}", post.content);
    })
}

fn cmd_post_delete(session: &Session, id: u64, out: &Output) -> anyhow::Result<()> {
    let client = session.signer()?;
    let refunded = client.delete_post(&client.address(), id)?;
    out.emit(json!({ "id": id, "refunded": refunded }), || {
        println!(
            "{} Deleted post #{} (refunded {})",
            "✓".green().bold(),
            id,
            refunded
        );
    })
}

fn cmd_list(session: &Session, args: AuthorArgs, out: &Output) -> anyhow::Result<()> {
    let author = session.author(args.author.as_deref())?;
    let client = session.reader()?;
    let posts = client.posts(&author)?;
    let mut entries = Vec::with_capacity(posts.len());
    for post in &posts {
        let address = client.post_address(&author, post.id)?;
        entries.push(post_json(&address, post));
    }
    out.emit(Value::Array(entries), || {
        if posts.is_empty() {
            println!("No posts.");
        }
        for post in &posts {
            print_post_summary(post);
        }
    })
}

fn cmd_address(session: &Session, args: AddressArgs, out: &Output) -> anyhow::Result<()> {
    let author = session.author(args.author.as_deref())?;
    let client = session.reader()?;
    let address = match args.id {
        Some(id) => client.post_address(&author, id)?,
        None => client.blog_address(&author)?,
    };
    out.emit(json!({ "address": address.to_hex() }), || {
        println!("{}", address.to_hex());
    })
}
