//! Integration tests for build context hashing

mod cli;
mod ignore_rules;
mod streaming_bound;
