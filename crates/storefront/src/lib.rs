//! FurnitureCo Storefront library.
//!
//! This crate provides the public catalog site as a library, allowing the
//! router to be driven from integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
