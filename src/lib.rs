//! Context Hash: Deterministic Build Context Fingerprints
//!
//! Computes a content-only SHA-256 digest of a container build context. The
//! context is archived in a fixed order with ownership and modification times
//! normalized, so two trees with the same included content hash the same no
//! matter when or by whom they were written.

pub mod api;
pub mod archive;
pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod ignore;
pub mod logging;
pub mod normalize;
pub mod pipe;
pub mod trace;
pub mod tree;
pub mod validate;

pub use api::{hash_context, ContextHasher, DEFAULT_DOCKERFILE};
pub use error::{ArchiveError, ContextHashError, FatalError, IgnoreError};
pub use trace::{LogTrace, NoTrace, PathTrace, WriterTrace};
