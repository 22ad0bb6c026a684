//! # Dossier Core
//!
//! Shared, WASM-safe logic for Dossier: data models, error taxonomy,
//! chunking strategies, vector store abstraction, retrieval engine, and
//! feedback scoring.
//!
//! This crate contains no tokio, filesystem I/O, or other native-only
//! dependencies. The ingestion pipeline (file reading, encoding fallback,
//! concurrent folder walks) lives in the `dossier` app crate.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Core data types: `Document`, `Chunk`, `DocumentType` |
//! | [`error`] | Typed error taxonomy (`DossierError`) |
//! | [`chunk`] | Pluggable chunking strategies over byte-offset spans |
//! | [`embedding`] | Embedding provider trait and vector utilities |
//! | [`store`] | `VectorStore` trait plus an in-memory implementation |
//! | [`retrieve`] | Nearest / multi-stage / clustered / personalized retrieval |
//! | [`feedback`] | Append-only feedback log and bounded boost folding |

pub mod chunk;
pub mod embedding;
pub mod error;
pub mod feedback;
pub mod models;
pub mod retrieve;
pub mod store;
