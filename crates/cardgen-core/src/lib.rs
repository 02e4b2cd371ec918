#![deny(missing_docs)]
//! Cardgen core library.
//!
//! Transport-agnostic logic for generating Luhn-valid test card numbers,
//! caching the latest batch per conversation and exporting it as a file.

/// Brand classification by numeric prefix.
pub mod brand;
/// Card domain types (BIN, expiry, records, batches).
pub mod card;
/// `.gen` command parsing.
pub mod command;
/// Configuration management.
pub mod config;
/// Error types shared by the core.
pub mod error;
/// Batch serialization into downloadable files.
pub mod export;
/// Batch synthesis.
pub mod generator;
/// Luhn checksum engine.
pub mod luhn;
/// Generate-and-cache facade used by transports.
pub mod service;
/// Per-conversation batch cache.
pub mod session;

/// Mock store fixtures for unit tests.
#[cfg(test)]
pub mod testing;

pub use error::CardGenError;
