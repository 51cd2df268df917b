//! Shared building blocks: handles, colors, geometry re-exports, errors.

/// Ids, colors, and kurbo geometry re-exports.
pub mod core;
/// The crate-wide error taxonomy.
pub mod error;
