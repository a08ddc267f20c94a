//! Spiceglass SpiceDB Client
//!
//! This crate talks to SpiceDB's v1 HTTP gateway: schema reads and
//! writes, relationship writes, reads, and exports, permission checks
//! and lookups, and permission tree expansion. Expansion results convert
//! into the core tree model, and the client doubles as the expansion
//! resolver for tree simplification.

pub mod client;
pub mod config;
pub mod wire;

#[cfg(test)]
mod client_tests;

// Re-export commonly used types
pub use client::{BulkCheckOutcome, BulkCheckResult, LookupEntry, SpiceDbClient};
pub use config::ClientConfig;
pub use wire::{LookupPermissionship, Permissionship};
