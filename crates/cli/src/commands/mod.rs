//! Subcommand implementations.
//!
//! Each command takes the store and caller explicitly so it can run
//! against the in-memory backend in tests.

pub mod admin;
pub mod seed;
