//! JSONL output for a bundle.
//!
//! [`BundleWriter`] streams records straight to `documents.jsonl`,
//! `chunks.jsonl`, and `citations.jsonl`. [`StagedEntry`] holds one entry's
//! records in memory until it is committed, which lets `--keep-going` drop
//! a failed entry without leaving orphaned chunks behind.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::models::{ChunkRecord, CitationRecord, DocumentRecord, Report};

pub const DOCUMENTS_FILE: &str = "documents.jsonl";
pub const CHUNKS_FILE: &str = "chunks.jsonl";
pub const CITATIONS_FILE: &str = "citations.jsonl";
pub const REPORT_FILE: &str = "report.json";

/// Destination for the three record streams.
pub trait RecordSink {
    fn citation(&mut self, record: &CitationRecord) -> io::Result<()>;
    fn chunk(&mut self, record: &ChunkRecord) -> io::Result<()>;
    fn document(&mut self, record: &DocumentRecord) -> io::Result<()>;
}

fn write_line<W: Write, T: Serialize>(out: &mut W, record: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")
}

struct JsonlFile {
    path: PathBuf,
    out: BufWriter<File>,
}

impl JsonlFile {
    fn create(path: PathBuf) -> Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self {
            path,
            out: BufWriter::new(file),
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.out
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))
    }
}

pub struct BundleWriter {
    documents: JsonlFile,
    chunks: JsonlFile,
    citations: JsonlFile,
}

impl BundleWriter {
    /// Create (or truncate) the three JSONL files inside `dir`.
    pub fn create(dir: &Path) -> Result<Self> {
        Ok(Self {
            documents: JsonlFile::create(dir.join(DOCUMENTS_FILE))?,
            chunks: JsonlFile::create(dir.join(CHUNKS_FILE))?,
            citations: JsonlFile::create(dir.join(CITATIONS_FILE))?,
        })
    }

    /// Append a staged entry's records to the output files.
    pub fn commit(&mut self, staged: StagedEntry) -> io::Result<()> {
        self.citations.out.write_all(&staged.citations)?;
        self.chunks.out.write_all(&staged.chunks)?;
        self.documents.out.write_all(&staged.documents)
    }

    /// Flush all buffered output. Must be called before the writer is dropped.
    pub fn finish(mut self) -> Result<()> {
        self.documents.flush()?;
        self.chunks.flush()?;
        self.citations.flush()
    }
}

impl RecordSink for BundleWriter {
    fn citation(&mut self, record: &CitationRecord) -> io::Result<()> {
        write_line(&mut self.citations.out, record)
    }

    fn chunk(&mut self, record: &ChunkRecord) -> io::Result<()> {
        write_line(&mut self.chunks.out, record)
    }

    fn document(&mut self, record: &DocumentRecord) -> io::Result<()> {
        write_line(&mut self.documents.out, record)
    }
}

/// One entry's serialized records, held until [`BundleWriter::commit`].
#[derive(Default)]
pub struct StagedEntry {
    documents: Vec<u8>,
    chunks: Vec<u8>,
    citations: Vec<u8>,
}

impl RecordSink for StagedEntry {
    fn citation(&mut self, record: &CitationRecord) -> io::Result<()> {
        write_line(&mut self.citations, record)
    }

    fn chunk(&mut self, record: &ChunkRecord) -> io::Result<()> {
        write_line(&mut self.chunks, record)
    }

    fn document(&mut self, record: &DocumentRecord) -> io::Result<()> {
        write_line(&mut self.documents, record)
    }
}

/// Write `report.json` (pretty-printed) into `dir`.
pub fn write_report(dir: &Path, report: &Report) -> Result<()> {
    let path = dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))
}
