//! Deterministic identifiers for documents, chunks, and citations.
//!
//! Every identifier is a truncated SHA-256 digest of the semantic content it
//! names, so re-running over an unchanged archive yields the same keys. The
//! full digests stay on the records (`content_hash_sha256`,
//! `text_hash_sha256`) for integrity checks.
//!
//! | Kind | Input | Prefix | Hex chars |
//! |------|-------|--------|-----------|
//! | document | `source_url` | `doc_` | 12 |
//! | chunk | `{document_id}:{ordinal}:{text_hash}` | `chk_` | 16 |
//! | citation | `{chunk_id}:{snapshot_hash}:{locator}` | `cit_` | 16 |
//!
//! Downstream stores are keyed on this scheme; prefixes and lengths must not
//! change.

use sha2::{Digest, Sha256};

const DOCUMENT_PREFIX: &str = "doc_";
const CHUNK_PREFIX: &str = "chk_";
const CITATION_PREFIX: &str = "cit_";

const DOCUMENT_HEX_LEN: usize = 12;
const CHUNK_HEX_LEN: usize = 16;
const CITATION_HEX_LEN: usize = 16;

/// Lowercase hex SHA-256 of the UTF-8 encoding of `text`.
pub fn sha256_hex(text: &str) -> String {
    sha256_bytes_hex(text.as_bytes())
}

/// Lowercase hex SHA-256 of raw bytes.
pub fn sha256_bytes_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Synthetic locator for an entry inside an archive: `zip://{archive}/{entry}`.
pub fn source_url(archive_name: &str, entry_path: &str) -> String {
    format!("zip://{}/{}", archive_name, entry_path)
}

/// Textual page locator used when deriving citation IDs.
pub fn page_locator(page: u32) -> String {
    format!("page_{}", page)
}

pub fn document_id(source_url: &str) -> String {
    prefixed(DOCUMENT_PREFIX, source_url, DOCUMENT_HEX_LEN)
}

pub fn chunk_id(document_id: &str, ordinal: u64, text_hash: &str) -> String {
    let composite = format!("{}:{}:{}", document_id, ordinal, text_hash);
    prefixed(CHUNK_PREFIX, &composite, CHUNK_HEX_LEN)
}

pub fn citation_id(chunk_id: &str, snapshot_hash: &str, locator: &str) -> String {
    let composite = format!("{}:{}:{}", chunk_id, snapshot_hash, locator);
    prefixed(CITATION_PREFIX, &composite, CITATION_HEX_LEN)
}

fn prefixed(prefix: &str, input: &str, hex_len: usize) -> String {
    let digest = sha256_hex(input);
    format!("{}{}", prefix, &digest[..hex_len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vectors() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(sha256_bytes_hex(b"abc"), sha256_hex("abc"));
    }

    #[test]
    fn document_id_is_prefix_of_url_hash() {
        let url = source_url("a.zip", "docs/x.pdf");
        assert_eq!(url, "zip://a.zip/docs/x.pdf");

        let id = document_id(&url);
        assert!(id.starts_with("doc_"));
        assert_eq!(id.len(), 4 + 12);
        assert_eq!(&id[4..], &sha256_hex(&url)[..12]);
    }

    #[test]
    fn chunk_id_hashes_composite_string() {
        let text_hash = sha256_hex("Foo");
        let id = chunk_id("doc_0123456789ab", 3, &text_hash);
        let expected = sha256_hex(&format!("doc_0123456789ab:3:{}", text_hash));
        assert_eq!(id, format!("chk_{}", &expected[..16]));
    }

    #[test]
    fn citation_id_hashes_composite_string() {
        let id = citation_id("chk_0011223344556677", "deadbeef", &page_locator(2));
        let expected = sha256_hex("chk_0011223344556677:deadbeef:page_2");
        assert_eq!(id, format!("cit_{}", &expected[..16]));
        assert_eq!(id.len(), 4 + 16);
    }

    #[test]
    fn identifiers_are_deterministic() {
        let url = source_url("corpus.zip", "laws/act.pdf");
        assert_eq!(document_id(&url), document_id(&url));

        let doc = document_id(&url);
        let h = sha256_hex("text");
        assert_eq!(chunk_id(&doc, 0, &h), chunk_id(&doc, 0, &h));
        assert_eq!(
            citation_id("chk_a", "b", "page_1"),
            citation_id("chk_a", "b", "page_1")
        );
    }

    #[test]
    fn distinct_inputs_give_distinct_identifiers() {
        let a = document_id(&source_url("a.zip", "x.pdf"));
        let b = document_id(&source_url("a.zip", "y.pdf"));
        assert_ne!(a, b);

        let h = sha256_hex("same text");
        assert_ne!(chunk_id(&a, 0, &h), chunk_id(&a, 1, &h));
        assert_ne!(chunk_id(&a, 0, &h), chunk_id(&b, 0, &h));
        assert_ne!(
            chunk_id(&a, 0, &h),
            chunk_id(&a, 0, &sha256_hex("other text"))
        );
        assert_ne!(
            citation_id("chk_x", "snap", "page_1"),
            citation_id("chk_x", "snap", "page_2")
        );
    }
}
