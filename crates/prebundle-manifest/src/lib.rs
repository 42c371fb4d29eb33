//! # prebundle-manifest
//!
//! Document layer for package manifests (`package.json`).
//!
//! This crate provides:
//! - `ManifestDocument` (parsed key-value tree with a tool-private config section)
//! - `DocumentStore` (read/write manifest text by path, blocking and async)
//! - `FsDocumentStore` and `MemoryDocumentStore` adapters
//!
//! It intentionally knows nothing about entrypoints or validation.
//! Typed field access lives in `prebundle-entrypoint`.
//!
//! ## Data model
//!
//! ```text
//! package.json (on disk, pretty JSON)
//!     ↕  DocumentStore::read_text / write_text
//! ManifestDocument (ordered map; "prebundle" holds tool config)
//! ```

pub mod document;
pub mod error;
pub mod store;

pub use document::{CONFIG_SECTION, MANIFEST_FILE_NAME, ManifestDocument, value_kind};
pub use error::ManifestError;
pub use store::{DocumentStore, FsDocumentStore, MemoryDocumentStore};
