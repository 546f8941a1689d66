//! ZIP archive input.
//!
//! Lists the PDF entries of an archive in central-directory order and reads
//! them one at a time, so only a single entry's bytes are held in memory.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Largest decompressed entry accepted (1 GiB).
pub const MAX_ENTRY_BYTES: u64 = 1024 * 1024 * 1024;

/// A PDF entry inside the archive, addressed by index so duplicate names
/// stay distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfEntry {
    pub index: usize,
    pub name: String,
}

pub struct PdfArchive {
    name: String,
    archive: zip::ZipArchive<File>,
}

/// Case-insensitive `.pdf` suffix check on an archive entry name.
pub fn is_pdf_entry(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".pdf")
}

impl PdfArchive {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open archive: {}", path.display()))?;
        let archive = zip::ZipArchive::new(file)
            .with_context(|| format!("Not a valid ZIP archive: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, archive })
    }

    /// File name of the archive, as used in `zip://` source URLs.
    pub fn archive_name(&self) -> &str {
        &self.name
    }

    /// PDF entries in archive listing order. Other entries are logged and skipped.
    pub fn pdf_entries(&mut self) -> Result<Vec<PdfEntry>> {
        let mut entries = Vec::new();
        for index in 0..self.archive.len() {
            let entry = self
                .archive
                .by_index_raw(index)
                .with_context(|| format!("Failed to read archive entry #{}", index))?;
            let name = entry.name().to_string();
            if entry.is_dir() || !is_pdf_entry(&name) {
                tracing::debug!(entry = %name, "skipping non-PDF entry");
                continue;
            }
            entries.push(PdfEntry { index, name });
        }
        Ok(entries)
    }

    /// Decompress one entry into memory, up to [`MAX_ENTRY_BYTES`].
    pub fn read_entry(&mut self, entry: &PdfEntry) -> Result<Vec<u8>> {
        self.read_entry_bounded(entry, MAX_ENTRY_BYTES)
    }

    /// The declared size in the header is not trusted; the limit applies to
    /// bytes actually inflated.
    pub fn read_entry_bounded(&mut self, entry: &PdfEntry, max_bytes: u64) -> Result<Vec<u8>> {
        let file = self
            .archive
            .by_index(entry.index)
            .with_context(|| format!("Failed to open archive entry: {}", entry.name))?;
        let mut bytes = Vec::new();
        file.take(max_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .with_context(|| format!("Failed to read archive entry: {}", entry.name))?;
        if bytes.len() as u64 > max_bytes {
            bail!(
                "Archive entry {} exceeds size limit ({} bytes)",
                entry.name,
                max_bytes
            );
        }
        Ok(bytes)
    }
}
