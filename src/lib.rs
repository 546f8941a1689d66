//! # kb-bundle
//!
//! Converts a ZIP archive of PDF documents into a deterministic, append-only
//! JSONL bundle for knowledge-base ingestion: documents, page chunks, and
//! page citations, plus a `report.json` with counts.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ ZIP      │──▶│ PDF pages   │──▶│ IDs + records│──▶│ documents.jsonl  │
//! │ archive  │   │ (non-empty) │   │ (sha-256)    │   │ chunks.jsonl     │
//! └──────────┘   └─────────────┘   └──────────────┘   │ citations.jsonl  │
//!                                                     │ report.json      │
//!                                                     └──────────────────┘
//! ```
//!
//! Identifiers are pure functions of content (see [`ids`]), so re-running
//! over an unchanged archive reproduces every `document_id`, `chunk_id`, and
//! `citation_id`; only the run timestamp changes.
//!
//! ## Quick Start
//!
//! ```bash
//! kb-bundle --zip laws.zip --out ./bundle \
//!     --tenant-id default --corpus-version 0.1.0 --trust-level internal
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`ids`] | Deterministic document/chunk/citation identifiers |
//! | [`models`] | Record types and the run report |
//! | [`config`] | Optional TOML config for fixed metadata and backend |
//! | [`archive`] | ZIP entry listing and reading |
//! | [`extract`] | Per-page PDF text extraction |
//! | [`writer`] | JSONL output streams |
//! | [`bundle`] | The generation pipeline |
//! | [`check`] | Offline bundle verification |
//! | [`progress`] | Stderr progress reporting |

pub mod archive;
pub mod bundle;
pub mod check;
pub mod config;
pub mod extract;
pub mod ids;
pub mod models;
pub mod progress;
pub mod writer;
