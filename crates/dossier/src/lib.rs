//! # Dossier
//!
//! Ingestion pipeline and operational surface over the `dossier-core`
//! retrieval engine: filesystem reading with encoding fallback, document
//! deduplication and integrity verification, concurrent folder ingestion,
//! corpus statistics, and TOML configuration.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration with validation |
//! | [`read`] | Source decoding with encoding fallback |
//! | [`embedding`] | Deterministic offline embedding provider |
//! | [`ingest`] | Ingestion pipeline, dedup, and verification |
//! | [`stats`] | Read-only corpus statistics |

pub mod config;
pub mod embedding;
pub mod ingest;
pub mod read;
pub mod stats;
