//! FurnitureCo Admin library.
//!
//! The content-management panel as a library, so the router can be driven
//! end to end in tests.
//!
//! Every screen except the login flow sits behind one gate
//! ([`middleware::require_admin`]) that checks the signed-in user for the
//! admin role once per session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use config::AdminConfig;
pub use routes::router;
pub use state::AppState;
