//! # kb-bundle CLI
//!
//! Converts a ZIP archive of PDFs into a JSONL knowledge-base bundle.
//!
//! ## Usage
//!
//! ```bash
//! kb-bundle --zip <archive.zip> --out <dir> --tenant-id <id> --corpus-version <v>
//! ```
//!
//! ## Outputs
//!
//! | File | Contents |
//! |------|----------|
//! | `documents.jsonl` | One record per PDF entry |
//! | `chunks.jsonl` | One record per non-empty page |
//! | `citations.jsonl` | One page locator per chunk |
//! | `report.json` | Record counts |
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use clap::Parser;
use kb_bundle::bundle::{self, BundleOptions};
use kb_bundle::config::{self, Config};
use kb_bundle::progress::ProgressMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Convert a ZIP archive of PDF documents into a deterministic JSONL bundle
/// (documents, chunks, citations, report) for knowledge-base ingestion.
#[derive(Parser)]
#[command(name = "kb-bundle", version, about)]
struct Cli {
    /// Path to the input ZIP archive.
    #[arg(long)]
    zip: PathBuf,

    /// Output directory; created (with parents) if missing.
    #[arg(long)]
    out: PathBuf,

    /// Tenant identifier. Accepted for partitioning; not written to records.
    #[arg(long)]
    tenant_id: String,

    /// Corpus version stamped on every record.
    #[arg(long)]
    corpus_version: String,

    /// Trust level stamped on documents and chunks.
    #[arg(long, default_value = "internal")]
    trust_level: String,

    /// Optional TOML config overriding record metadata and the PDF backend.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Record PDFs that fail to extract in report.json and continue.
    #[arg(long)]
    keep_going: bool,

    /// Re-read the bundle after writing and check its invariants.
    #[arg(long)]
    verify: bool,

    /// Progress output on stderr. Defaults to `human` on a TTY, else `off`.
    #[arg(long, value_enum)]
    progress: Option<ProgressMode>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };

    let options = BundleOptions {
        zip: cli.zip,
        out: cli.out,
        tenant_id: cli.tenant_id,
        corpus_version: cli.corpus_version,
        trust_level: cli.trust_level,
        keep_going: cli.keep_going,
    };
    let progress = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);

    bundle::run_bundle(&options, &cfg, progress, cli.verify)
}
