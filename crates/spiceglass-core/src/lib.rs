//! Spiceglass Core Library
//!
//! This crate provides the heart of spiceglass: reference-string parsing,
//! the permission tree model, tree simplification through a pluggable
//! expansion resolver, and GraphViz DOT rendering of simplified trees.
//! It performs no I/O of its own; the client crate plugs in as the
//! resolver for live expansions.

pub mod dot;
pub mod error;
pub mod reference;
pub mod tree;


// Re-export commonly used types
pub use dot::{render_dot, DotBuilder, DotOptions};
pub use error::{Error, Result};
pub use reference::{ObjectRef, PermissionQuery, Relationship, SubjectRef};
pub use tree::{
    simplify_tree, PermissionTree, SetOperation, SimplifiedTree, TreeExpander, TreeType,
};
