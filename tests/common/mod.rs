//! Shared fixtures: archive builders, a hand-rolled PDF writer, and a fake
//! page extractor whose "PDFs" are form-feed separated UTF-8 pages.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

use kb_bundle::extract::{ExtractError, Page, PageExtractor, PageIter};

/// Write a ZIP at `path` with the given entries, in order.
pub fn write_zip(path: &Path, entries: &[(&str, Vec<u8>)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, body) in entries {
        zip.start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(body).unwrap();
    }
    zip.finish().unwrap();
}

/// Fake PDF content for [`FakePdf`]: pages joined by form feeds.
pub fn fake_pdf(pages: &[&str]) -> Vec<u8> {
    pages.join("\x0c").into_bytes()
}

/// Bytes starting with this marker fail to open.
pub const CORRUPT: &[u8] = b"CORRUPT";
/// A page with exactly this text fails mid-document.
pub const FAIL_PAGE: &str = "FAIL";

/// Extractor over [`fake_pdf`] bytes. Lazy like the real backends: a failing
/// page only errors when it is reached.
pub struct FakePdf;

impl PageExtractor for FakePdf {
    fn pages<'a>(&self, bytes: &'a [u8]) -> Result<PageIter<'a>, ExtractError> {
        if bytes.starts_with(CORRUPT) {
            return Err(ExtractError::Open("corrupt test PDF".to_string()));
        }
        let text = std::str::from_utf8(bytes).map_err(|e| ExtractError::Open(e.to_string()))?;
        Ok(Box::new(text.split('\x0c').zip(1u32..).filter_map(
            |(raw, number)| {
                if raw == FAIL_PAGE {
                    return Some(Err(ExtractError::Page {
                        page: number,
                        reason: "unreadable content stream".to_string(),
                    }));
                }
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Ok(Page {
                        number,
                        text: trimmed.to_string(),
                    }))
                }
            },
        )))
    }
}

/// Minimal valid PDF with one page per entry of `pages`, each drawing its
/// text in Helvetica. Offsets in the xref table are computed exactly.
pub fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut offsets = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 4 + 2 * i).collect();
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");

    offsets.push(out.len());
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
    offsets.push(out.len());
    out.extend_from_slice(
        format!(
            "2 0 obj << /Type /Pages /Kids [{}] /Count {} >> endobj\n",
            kids,
            pages.len()
        )
        .as_bytes(),
    );
    offsets.push(out.len());
    out.extend_from_slice(
        b"3 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >> endobj\n",
    );

    for (i, text) in pages.iter().enumerate() {
        let page_id = 4 + 2 * i;
        let content_id = page_id + 1;
        offsets.push(out.len());
        out.extend_from_slice(
            format!(
                "{} 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents {} 0 R /Resources << /Font << /F1 3 0 R >> >> >> endobj\n",
                page_id, content_id
            )
            .as_bytes(),
        );
        let stream = format!("BT /F1 12 Tf 100 700 Td ({}) Tj ET", text);
        offsets.push(out.len());
        out.extend_from_slice(
            format!(
                "{} 0 obj << /Length {} >> stream\n{}\nendstream endobj\n",
                content_id,
                stream.len(),
                stream
            )
            .as_bytes(),
        );
    }

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!("trailer << /Size {} /Root 1 0 R >>\nstartxref\n", offsets.len() + 1).as_bytes(),
    );
    out.extend_from_slice(format!("{}\n", xref_start).as_bytes());
    out.extend_from_slice(b"%%EOF\n");
    out
}

/// Parse every line of a JSONL file as a JSON value.
pub fn read_jsonl(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}
