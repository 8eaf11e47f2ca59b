//! DraftStore - project/document store with encrypted snapshot persistence
//!
//! Owns the in-memory records of a writing session (projects, ordered
//! documents, settings) and persists them as a single encrypted snapshot
//! in a local key-value store.
//!
//! # Architecture
//!
//! ```text
//! DocumentStore (in-memory, ordered)
//!     │ snapshot() / restore()
//!     ▼
//! PersistenceGateway ── seal/open (ChaCha20-Poly1305) ──► KvStore
//!                                                          ├── SqliteKv (disk)
//!                                                          └── MemoryKv (tests)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use draftstore::{DocumentStore, DocumentKind};
//!
//! let mut store = DocumentStore::new();
//! let project = store.create_project("Novel", "fantasy", "", None);
//! let doc = store.create_document(&project, "Chapter 1", DocumentKind::Chapter)?;
//! store.update_content(&doc, "<p>It was a dark and stormy night.</p>")?;
//! ```

pub mod cipher;
pub mod cli;
pub mod config;
mod error;
pub mod gateway;
pub mod kv;
pub mod markup;
mod record;
mod store;

pub use error::StoreError;
pub use gateway::{PersistenceGateway, Snapshot, SNAPSHOT_VERSION, STATE_KEY};
pub use kv::{KvStore, MemoryKv, SqliteKv};
pub use markup::{to_plain_text, word_count};
pub use record::{now_ms, Document, DocumentKind, Project, PromptTemplates, Settings};
pub use store::DocumentStore;
