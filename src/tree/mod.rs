//! Context tree traversal
//!
//! Walks a build context in a fixed order and names every entry by its
//! slash-separated path relative to the context root.

pub mod path;
pub mod walker;
