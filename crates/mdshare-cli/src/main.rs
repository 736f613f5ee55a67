//! mdshare: share markdown documents as self-contained links
//!
//! Commands:
//!   share <file>            - build a (password-protected) share URL
//!   open <url|payload>      - decrypt a share link and print or import it
//!   estimate <file>         - report whether a document fits in a link
//!   config show             - display current configuration

mod store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use std::time::Duration;

use mdshare_core::config::ShareConfig;
use mdshare_core::{ContentRecord, ErrorKind, SharedDocument};
use mdshare_share::{
    Pipeline, ShareFlow, ShareSettings, ShareState, SizeEstimator, ViewerFlow, ViewerState,
};

use crate::store::{expand_tilde, DirectoryStore};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "mdshare",
    version,
    about = "Share markdown documents as encrypted links",
    long_about = "mdshare: pack a markdown document into a URL fragment, optionally \
                  encrypted with a password, and open such links again"
)]
struct Cli {
    /// Path to mdshare.toml configuration file
    #[arg(
        long,
        short = 'c',
        env = "MDSHARE_CONFIG",
        default_value = "~/.config/mdshare/config.toml"
    )]
    config: PathBuf,

    /// Log filter (overrides config), e.g. "debug" or "mdshare_share=trace"
    #[arg(long, env = "MDSHARE_LOG")]
    log: Option<String>,

    /// Log output format (overrides config)
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a share URL for a markdown file
    ///
    /// Prompts for a password twice unless --no-password is given.
    Share {
        /// Markdown file to share
        file: PathBuf,
        /// Document title (default: file name without extension)
        #[arg(long, short = 't')]
        title: Option<String>,
        /// Produce an unencrypted link
        #[arg(long)]
        no_password: bool,
    },

    /// Open a share URL (or bare payload) and print its markdown
    Open {
        /// Full share URL, `#fragment`, or bare payload
        link: String,
        /// Save the document into the configured documents directory
        #[arg(long)]
        import: bool,
    },

    /// Estimate whether a markdown file fits in a share link
    Estimate {
        /// Markdown file to check
        file: PathBuf,
        /// Document title (default: file name without extension)
        #[arg(long, short = 't')]
        title: Option<String>,
        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Json,
    Text,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = expand_tilde(&cli.config);
    let loaded = ShareConfig::load(&config_path)?;
    let config_found = loaded.is_some();
    let config = loaded.unwrap_or_default();

    let level = cli.log.clone().unwrap_or_else(|| config.log.level.clone());
    let format = cli
        .log_format
        .unwrap_or_else(|| parse_log_format(&config.log.format));
    init_logging(&level, format);

    if !config_found {
        tracing::warn!("config file not found: {}  (using defaults)", config_path.display());
    }

    match cli.command {
        Commands::Share { file, title, no_password } => {
            cmd_share(&config, &file, title, no_password).await
        }
        Commands::Open { link, import } => cmd_open(&config, &link, import).await,
        Commands::Estimate { file, title, json } => cmd_estimate(&config, &file, title, json).await,
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &config_path),
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

fn parse_log_format(s: &str) -> LogFormat {
    if s.eq_ignore_ascii_case("json") {
        LogFormat::Json
    } else {
        LogFormat::Text
    }
}

fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries URLs and markdown
    match format {
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(std::io::stderr)).init(),
        LogFormat::Text => registry.with(fmt::layer().with_writer(std::io::stderr)).init(),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn make_spinner(prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{prefix:.bold} {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn prompt_secret(prompt: &str) -> Result<SecretString> {
    let entered = rpassword::prompt_password(prompt).context("reading password")?;
    Ok(SecretString::from(entered))
}

async fn read_document(file: &Path, title: Option<String>) -> Result<SharedDocument> {
    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let title = title.unwrap_or_else(|| {
        file.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    });
    Ok(SharedDocument::new(title, content))
}

fn fmt_bytes(n: usize) -> String {
    if n >= 1024 {
        format!("{:.1} KiB", n as f64 / 1024.0)
    } else {
        format!("{n} B")
    }
}

// ── `mdshare share` ───────────────────────────────────────────────────────────

async fn cmd_share(
    config: &ShareConfig,
    file: &Path,
    title: Option<String>,
    no_password: bool,
) -> Result<()> {
    let doc = read_document(file, title).await?;
    let settings = ShareSettings::from(&config.share);
    let mut flow = ShareFlow::new(Pipeline::default(), settings, &doc)?;

    let estimate = *flow.estimate();
    tracing::info!(
        words = estimate.word_count,
        estimated = estimate.estimated_bytes,
        limit = estimate.limit_bytes,
        "share estimate"
    );
    if !estimate.fits {
        anyhow::bail!(
            "document is too large to share as a link: ~{} of {} allowed ({} words)",
            fmt_bytes(estimate.estimated_bytes),
            fmt_bytes(estimate.limit_bytes),
            estimate.word_count,
        );
    }

    if no_password {
        flow.share_plain();
    }

    loop {
        match flow.state() {
            ShareState::Ready { url, .. } => {
                println!("{url}");
                return Ok(());
            }
            ShareState::EditingPassword { error: Some(e) } if e.kind() != ErrorKind::Validation => {
                anyhow::bail!("share failed: {e}");
            }
            ShareState::EditingPassword { error } => {
                if let Some(e) = error {
                    eprintln!("{e}");
                }
            }
            ShareState::Validating | ShareState::Encrypting => {
                anyhow::bail!("share flow stalled in a busy state");
            }
        }

        let password = prompt_secret("Password: ")?;
        let confirmation = prompt_secret("Confirm password: ")?;

        let pb = make_spinner("share");
        pb.set_message("deriving key...");
        flow = tokio::task::spawn_blocking(move || {
            flow.submit(&password, &confirmation);
            flow
        })
        .await
        .context("share task panicked")?;
        pb.finish_and_clear();
    }
}

// ── `mdshare open` ────────────────────────────────────────────────────────────

async fn cmd_open(config: &ShareConfig, link: &str, import: bool) -> Result<()> {
    let mut viewer = ViewerFlow::open(Pipeline::default(), link);

    loop {
        match viewer.state() {
            ViewerState::Content(record) => {
                if import {
                    let mut store = DirectoryStore::new(&config.store.documents_dir);
                    let id = viewer.import_into(&mut store)?;
                    println!("imported {id} into {}", store.dir().display());
                } else {
                    if !record.title.is_empty() {
                        tracing::info!(title = %record.title, "opened shared document");
                    }
                    print!("{}", record.markdown);
                    if !record.markdown.ends_with('\n') {
                        println!();
                    }
                }
                return Ok(());
            }
            ViewerState::Failed(e) => anyhow::bail!("cannot open link: {e}"),
            ViewerState::AwaitingPassword { error } => {
                if let Some(e) = error {
                    eprintln!("{e}");
                }
            }
            ViewerState::Decrypting => anyhow::bail!("viewer stalled while decrypting"),
        }

        let password = prompt_secret("Password (empty to give up): ")?;
        if password.expose_secret().is_empty() {
            anyhow::bail!("no password entered");
        }

        let pb = make_spinner("open");
        pb.set_message("deriving key...");
        viewer = tokio::task::spawn_blocking(move || {
            viewer.submit(&password);
            viewer
        })
        .await
        .context("open task panicked")?;
        pb.finish_and_clear();
    }
}

// ── `mdshare estimate` ────────────────────────────────────────────────────────

async fn cmd_estimate(
    config: &ShareConfig,
    file: &Path,
    title: Option<String>,
    json: bool,
) -> Result<()> {
    let doc = read_document(file, title).await?;
    let estimate = SizeEstimator::new(config.share.max_payload_bytes)
        .estimate_record(&ContentRecord::from(&doc))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&estimate).context("serializing estimate")?
        );
        return Ok(());
    }

    println!("  words:      {}", estimate.word_count);
    println!("  compressed: {}", fmt_bytes(estimate.compressed_bytes));
    println!("  estimated:  {}", fmt_bytes(estimate.estimated_bytes));
    println!("  limit:      {}", fmt_bytes(estimate.limit_bytes));
    println!("  fits:       {}", if estimate.fits { "yes" } else { "no" });
    Ok(())
}

// ── `mdshare config show` ─────────────────────────────────────────────────────

fn cmd_config_show(config: &ShareConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}
