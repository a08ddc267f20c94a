//! CLI commands

pub mod check;
pub mod demo;
pub mod expand;
pub mod export;
pub mod graph;
pub mod lookup;
pub mod relate;
pub mod relationships;
pub mod schema;
