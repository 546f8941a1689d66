//! Offline verification of a written bundle.
//!
//! Re-reads the three JSONL streams and `report.json` and checks the
//! properties downstream importers rely on: report counts match line counts,
//! every reference resolves, identifiers recompute from their inputs, and
//! each document's ordinals run `0..k` in page order.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::ids;
use crate::models::{ChunkRecord, CitationRecord, DocumentRecord, Report};
use crate::writer::{CHUNKS_FILE, CITATIONS_FILE, DOCUMENTS_FILE, REPORT_FILE};

/// Outcome of [`check_bundle`].
#[derive(Debug, Default)]
pub struct CheckSummary {
    pub documents: u64,
    pub chunks: u64,
    pub citations: u64,
    pub violations: Vec<String>,
}

impl CheckSummary {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    /// Turn violations into an error listing them.
    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            return Ok(());
        }
        bail!(
            "bundle verification failed with {} violation(s):\n  {}",
            self.violations.len(),
            self.violations.join("\n  ")
        )
    }
}

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut records = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed record", path.display(), i + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Verify the bundle in `dir`. I/O and parse failures are errors; broken
/// invariants are collected into [`CheckSummary::violations`].
pub fn check_bundle(dir: &Path) -> Result<CheckSummary> {
    let documents: Vec<DocumentRecord> = read_jsonl(&dir.join(DOCUMENTS_FILE))?;
    let chunks: Vec<ChunkRecord> = read_jsonl(&dir.join(CHUNKS_FILE))?;
    let citations: Vec<CitationRecord> = read_jsonl(&dir.join(CITATIONS_FILE))?;

    let report_path = dir.join(REPORT_FILE);
    let report: Report = serde_json::from_str(
        &std::fs::read_to_string(&report_path)
            .with_context(|| format!("Failed to read {}", report_path.display()))?,
    )
    .with_context(|| format!("Malformed {}", report_path.display()))?;

    let mut summary = CheckSummary {
        documents: documents.len() as u64,
        chunks: chunks.len() as u64,
        citations: citations.len() as u64,
        violations: Vec::new(),
    };
    let v = &mut summary.violations;

    for (name, reported, actual) in [
        ("documents", report.documents, summary.documents),
        ("citations", report.citations, summary.citations),
        ("chunks", report.chunks, summary.chunks),
    ] {
        if reported != actual {
            v.push(format!(
                "report.json {} = {} but {} lines were written",
                name, reported, actual
            ));
        }
    }

    let mut docs_by_id: HashMap<&str, &DocumentRecord> = HashMap::new();
    for doc in &documents {
        if docs_by_id.insert(&doc.document_id, doc).is_some() {
            v.push(format!("duplicate document_id {}", doc.document_id));
        }
        if ids::document_id(&doc.source_url) != doc.document_id {
            v.push(format!(
                "document_id {} does not match source_url {}",
                doc.document_id, doc.source_url
            ));
        }
    }

    let mut chunks_by_id: HashMap<&str, &ChunkRecord> = HashMap::new();
    for chunk in &chunks {
        if chunks_by_id.insert(&chunk.chunk_id, chunk).is_some() {
            v.push(format!("duplicate chunk_id {}", chunk.chunk_id));
        }
        if !docs_by_id.contains_key(chunk.document_id.as_str()) {
            v.push(format!(
                "chunk {} references unknown document {}",
                chunk.chunk_id, chunk.document_id
            ));
        }
        if ids::sha256_hex(&chunk.text) != chunk.text_hash_sha256 {
            v.push(format!("chunk {} text_hash_sha256 mismatch", chunk.chunk_id));
        }
        if ids::chunk_id(&chunk.document_id, chunk.ordinal, &chunk.text_hash_sha256)
            != chunk.chunk_id
        {
            v.push(format!("chunk_id {} does not recompute", chunk.chunk_id));
        }
        if !chunk.index_pending {
            v.push(format!("chunk {} is not index_pending", chunk.chunk_id));
        }
    }

    let mut page_by_chunk: HashMap<&str, u32> = HashMap::new();
    let mut cited_chunks: HashSet<&str> = HashSet::new();
    for cit in &citations {
        let Some(chunk) = chunks_by_id.get(cit.chunk_id.as_str()) else {
            v.push(format!(
                "citation {} references unknown chunk {}",
                cit.citation_id, cit.chunk_id
            ));
            continue;
        };
        cited_chunks.insert(&cit.chunk_id);
        page_by_chunk.insert(&cit.chunk_id, cit.locator.page_from);

        if chunk.citation_id != cit.citation_id {
            v.push(format!(
                "chunk {} points at citation {} but {} cites it",
                chunk.chunk_id, chunk.citation_id, cit.citation_id
            ));
        }
        if let Some(doc) = docs_by_id.get(cit.document_id.as_str()) {
            if doc.content_hash_sha256 != cit.snapshot_hash_sha256 {
                v.push(format!(
                    "citation {} snapshot hash differs from document {}",
                    cit.citation_id, doc.document_id
                ));
            }
        } else {
            v.push(format!(
                "citation {} references unknown document {}",
                cit.citation_id, cit.document_id
            ));
        }
        let locator = ids::page_locator(cit.locator.page_from);
        if ids::citation_id(&cit.chunk_id, &cit.snapshot_hash_sha256, &locator) != cit.citation_id
        {
            v.push(format!("citation_id {} does not recompute", cit.citation_id));
        }
    }

    for chunk in &chunks {
        if !cited_chunks.contains(chunk.chunk_id.as_str()) {
            v.push(format!("chunk {} has no citation", chunk.chunk_id));
        }
    }

    // Ordinals per document in file order, paired with their cited page.
    let mut ordinals: HashMap<&str, Vec<(u64, Option<u32>)>> = HashMap::new();
    for chunk in &chunks {
        ordinals
            .entry(chunk.document_id.as_str())
            .or_default()
            .push((chunk.ordinal, page_by_chunk.get(chunk.chunk_id.as_str()).copied()));
    }
    for (doc_id, seq) in &ordinals {
        let contiguous = seq
            .iter()
            .enumerate()
            .all(|(i, (ordinal, _))| *ordinal == i as u64);
        if !contiguous {
            v.push(format!("document {} ordinals are not 0..{}", doc_id, seq.len()));
        }
        let pages: Vec<u32> = seq.iter().filter_map(|(_, page)| *page).collect();
        if pages.windows(2).any(|w| w[0] >= w[1]) {
            v.push(format!("document {} pages do not increase with ordinal", doc_id));
        }
    }

    Ok(summary)
}
