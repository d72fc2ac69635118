//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans with status and latency)
//! 3. Session layer (tower-sessions, in-memory store, SameSite=Strict)
//! 4. Admin gate (protected routes only, via `route_layer`)

pub mod auth;
pub mod session;

pub use auth::{AdminContext, LOGIN_PATH, RequireAdmin, clear_auth_session, require_admin};
pub use session::create_session_layer;
