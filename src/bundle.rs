//! Bundle generation pipeline.
//!
//! Walks the PDF entries of a ZIP archive in listing order and, for each one,
//! streams a citation and a chunk record per non-empty page followed by one
//! document record. Run totals are accumulated in a [`Report`] that is
//! returned to the caller and written as `report.json`.
//!
//! ```text
//! archive ──▶ entry bytes ──▶ PageExtractor ──▶ write_entry ──▶ RecordSink
//!                                   (page at a time)          (JSONL files)
//! ```
//!
//! Only one entry's bytes and one page's text are live at a time. Every
//! record of a run carries the same `created_at`/`updated_at`, captured once
//! in [`RunStamp`].

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

use crate::archive::PdfArchive;
use crate::check;
use crate::config::{Config, MetadataConfig};
use crate::extract::{ExtractError, PageExtractor};
use crate::ids;
use crate::models::{
    ChunkRecord, CitationRecord, DocumentRecord, EntryCounts, EntryFailure, Locator, Report,
};
use crate::progress::{BundleProgressEvent, BundleProgressReporter, ProgressMode};
use crate::writer::{self, BundleWriter, RecordSink, StagedEntry};

/// Inputs for one bundle run (the CLI flags).
#[derive(Debug, Clone)]
pub struct BundleOptions {
    pub zip: PathBuf,
    pub out: PathBuf,
    /// Accepted for multi-tenant partitioning; not written to records.
    pub tenant_id: String,
    pub corpus_version: String,
    pub trust_level: String,
    /// Skip entries whose extraction fails instead of aborting the run.
    pub keep_going: bool,
}

/// Values shared by every record of a run.
#[derive(Debug, Clone)]
pub struct RunStamp {
    pub corpus_version: String,
    pub trust_level: String,
    pub metadata: MetadataConfig,
    pub timestamp: String,
}

impl RunStamp {
    /// Capture the run timestamp now.
    pub fn capture(corpus_version: &str, trust_level: &str, metadata: &MetadataConfig) -> Self {
        Self {
            corpus_version: corpus_version.to_string(),
            trust_level: trust_level.to_string(),
            metadata: metadata.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }
}

#[derive(Debug, Error)]
pub enum EntryError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("failed to write records: {0}")]
    Write(#[from] io::Error),
}

/// Process one archive entry: emit a citation and chunk per non-empty page,
/// then the document record. Returns the number of records written.
pub fn write_entry<S: RecordSink>(
    sink: &mut S,
    extractor: &dyn PageExtractor,
    stamp: &RunStamp,
    archive_name: &str,
    entry_name: &str,
    bytes: &[u8],
) -> Result<EntryCounts, EntryError> {
    let source_url = ids::source_url(archive_name, entry_name);
    let document_id = ids::document_id(&source_url);
    let content_hash = ids::sha256_bytes_hex(bytes);
    let meta = &stamp.metadata;

    let mut counts = EntryCounts::default();
    let mut ordinal: u64 = 0;

    for page in extractor.pages(bytes)? {
        let page = page?;
        let text_hash = ids::sha256_hex(&page.text);
        let chunk_id = ids::chunk_id(&document_id, ordinal, &text_hash);
        let citation_id =
            ids::citation_id(&chunk_id, &content_hash, &ids::page_locator(page.number));

        sink.citation(&CitationRecord {
            citation_id: citation_id.clone(),
            document_id: document_id.clone(),
            chunk_id: chunk_id.clone(),
            corpus_version: stamp.corpus_version.clone(),
            locator: Locator::page(page.number),
            snapshot_hash_sha256: content_hash.clone(),
            snapshot_pointer: source_url.clone(),
            created_at: stamp.timestamp.clone(),
        })?;
        counts.citations += 1;

        sink.chunk(&ChunkRecord {
            chunk_id,
            document_id: document_id.clone(),
            citation_id,
            ordinal,
            section_path: vec![format!("Page {}", page.number)],
            text: page.text,
            text_hash_sha256: text_hash,
            language: meta.language.clone(),
            jurisdiction: meta.jurisdiction.clone(),
            instrument_type: meta.instrument_type.clone(),
            trust_level: stamp.trust_level.clone(),
            source_trust_level: stamp.trust_level.clone(),
            doc_status: meta.doc_status.clone(),
            effective_from: meta.effective_from.clone(),
            effective_to: meta.effective_to.clone(),
            snapshot_pointer: source_url.clone(),
            corpus_version: stamp.corpus_version.clone(),
            index_pending: true,
            created_at: stamp.timestamp.clone(),
            updated_at: stamp.timestamp.clone(),
        })?;
        counts.chunks += 1;

        ordinal += 1;
    }

    sink.document(&DocumentRecord {
        document_id,
        source_name: entry_name.to_string(),
        source_url: source_url.clone(),
        source_trust_level: stamp.trust_level.clone(),
        jurisdiction: meta.jurisdiction.clone(),
        instrument_type: meta.instrument_type.clone(),
        title: entry_name.to_string(),
        language: meta.language.clone(),
        effective_from: meta.effective_from.clone(),
        effective_to: meta.effective_to.clone(),
        content_hash_sha256: content_hash,
        snapshot_pointer: source_url,
        mime: meta.mime.clone(),
        size_bytes: bytes.len() as u64,
        corpus_version: stamp.corpus_version.clone(),
        status: meta.doc_status.clone(),
        created_at: stamp.timestamp.clone(),
        updated_at: stamp.timestamp.clone(),
    })?;
    counts.documents += 1;

    Ok(counts)
}

/// Generate a full bundle from `options.zip` into `options.out`.
///
/// Without `keep_going`, the first extraction failure aborts the run and the
/// output directory is left partially written. With it, a failing entry is
/// recorded in [`Report::errors`] and none of its records are kept.
pub fn generate_bundle(
    options: &BundleOptions,
    config: &Config,
    extractor: &dyn PageExtractor,
    progress: &dyn BundleProgressReporter,
) -> Result<Report> {
    let mut archive = PdfArchive::open(&options.zip)?;
    std::fs::create_dir_all(&options.out).with_context(|| {
        format!("Failed to create output directory: {}", options.out.display())
    })?;

    let stamp = RunStamp::capture(&options.corpus_version, &options.trust_level, &config.metadata);
    let archive_name = archive.archive_name().to_string();
    let entries = archive.pdf_entries()?;
    let total = entries.len() as u64;

    tracing::debug!(
        archive = %archive_name,
        tenant_id = %options.tenant_id,
        corpus_version = %options.corpus_version,
        entries = total,
        "starting bundle run"
    );

    let mut writer = BundleWriter::create(&options.out)?;
    let mut report = Report::default();

    for (n, entry) in entries.iter().enumerate() {
        progress.report(BundleProgressEvent::Started {
            entry: entry.name.clone(),
            n: n as u64 + 1,
            total,
        });
        let started = Instant::now();

        let bytes = archive.read_entry(entry)?;
        let result = if options.keep_going {
            let mut staged = StagedEntry::default();
            write_entry(&mut staged, extractor, &stamp, &archive_name, &entry.name, &bytes)
                .and_then(|counts| {
                    writer.commit(staged)?;
                    Ok(counts)
                })
        } else {
            write_entry(&mut writer, extractor, &stamp, &archive_name, &entry.name, &bytes)
        };

        match result {
            Ok(counts) => {
                report.add(counts);
                tracing::debug!(
                    entry = %entry.name,
                    size_bytes = bytes.len(),
                    chunks = counts.chunks,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "entry bundled"
                );
                progress.report(BundleProgressEvent::Finished {
                    entry: entry.name.clone(),
                    chunks: counts.chunks,
                });
            }
            Err(EntryError::Extract(e)) if options.keep_going => {
                tracing::warn!(entry = %entry.name, error = %e, "skipping entry");
                progress.report(BundleProgressEvent::Skipped {
                    entry: entry.name.clone(),
                    reason: e.to_string(),
                });
                report.errors.push(EntryFailure {
                    source_name: entry.name.clone(),
                    reason: e.to_string(),
                });
            }
            Err(EntryError::Extract(e)) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to extract PDF entry: {}", entry.name)));
            }
            Err(EntryError::Write(e)) => {
                return Err(anyhow::Error::new(e).context(format!(
                    "Failed to write records for {} into {}",
                    entry.name,
                    options.out.display()
                )));
            }
        }
    }

    writer.finish()?;
    writer::write_report(&options.out, &report)?;
    Ok(report)
}

/// CLI entry point: generate, optionally verify, and print a summary.
pub fn run_bundle(
    options: &BundleOptions,
    config: &Config,
    progress: ProgressMode,
    verify: bool,
) -> Result<()> {
    let extractor = config.extract.backend.extractor();
    let reporter = progress.reporter();
    let report = generate_bundle(options, config, extractor.as_ref(), reporter.as_ref())?;

    println!("bundle {}", options.out.display());
    println!("  documents: {}", report.documents);
    println!("  citations: {}", report.citations);
    println!("  chunks: {}", report.chunks);
    if !report.errors.is_empty() {
        println!("  skipped entries: {}", report.errors.len());
        for failure in &report.errors {
            println!("    {}: {}", failure.source_name, failure.reason);
        }
    }

    if verify {
        let summary = check::check_bundle(&options.out)?;
        summary.into_result()?;
        println!("  verified: ok");
    }

    println!("ok");
    Ok(())
}
