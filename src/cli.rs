//! CLI domain: argument parsing and the single hashing route.

mod parse;
mod route;

pub use parse::Cli;
pub use route::{execute, resolve_config};
