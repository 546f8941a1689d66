//! Record types written to a bundle.
//!
//! One JSON object per line in `documents.jsonl`, `chunks.jsonl`, and
//! `citations.jsonl`, plus the [`Report`] in `report.json`. Field names are
//! the wire format consumed by the knowledge-base importer; do not rename.

use serde::{Deserialize, Serialize};

/// One source PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub document_id: String,
    /// Archive-relative entry path.
    pub source_name: String,
    pub source_url: String,
    pub source_trust_level: String,
    pub jurisdiction: String,
    pub instrument_type: String,
    pub title: String,
    pub language: String,
    pub effective_from: String,
    pub effective_to: String,
    /// SHA-256 of the raw PDF bytes.
    pub content_hash_sha256: String,
    pub snapshot_pointer: String,
    pub mime: String,
    pub size_bytes: u64,
    pub corpus_version: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The extracted text of one non-empty page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub chunk_id: String,
    pub document_id: String,
    pub citation_id: String,
    /// 0-based position among the document's emitted pages.
    pub ordinal: u64,
    pub section_path: Vec<String>,
    pub text: String,
    pub text_hash_sha256: String,
    pub language: String,
    pub jurisdiction: String,
    pub instrument_type: String,
    pub trust_level: String,
    pub source_trust_level: String,
    pub doc_status: String,
    pub effective_from: String,
    pub effective_to: String,
    pub snapshot_pointer: String,
    pub corpus_version: String,
    /// Always `true` when written; the indexer flips it downstream.
    pub index_pending: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Page-range reference inside a source document (1-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub page_from: u32,
    pub page_to: u32,
}

impl Locator {
    pub fn page(page: u32) -> Self {
        Self {
            page_from: page,
            page_to: page,
        }
    }
}

/// Provenance for one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationRecord {
    pub citation_id: String,
    pub document_id: String,
    pub chunk_id: String,
    pub corpus_version: String,
    pub locator: Locator,
    /// Equals the owning document's `content_hash_sha256`.
    pub snapshot_hash_sha256: String,
    pub snapshot_pointer: String,
    pub created_at: String,
}

/// An entry skipped under `--keep-going`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFailure {
    pub source_name: String,
    pub reason: String,
}

/// Summary counts for one run, written as `report.json`.
///
/// `errors` is only present when a `--keep-going` run skipped entries, so a
/// clean run serializes to exactly `{"documents", "citations", "chunks"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub documents: u64,
    pub citations: u64,
    pub chunks: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EntryFailure>,
}

/// Records written for a single archive entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryCounts {
    pub documents: u64,
    pub citations: u64,
    pub chunks: u64,
}

impl Report {
    /// Fold one entry's counts into the run totals.
    pub fn add(&mut self, counts: EntryCounts) {
        self.documents += counts.documents;
        self.citations += counts.citations;
        self.chunks += counts.chunks;
    }
}
