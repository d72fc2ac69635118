//! FurnitureCo Store - data access for the hosted backend.
//!
//! The site keeps no database of its own. Products, managed page copy,
//! contact details and role grants live in a hosted Supabase project,
//! reached through its table API, and admins sign in through its auth API.
//!
//! # Layers
//!
//! - [`TableStore`] / [`AuthProvider`] - the backend seams
//! - [`SupabaseClient`] - the production implementation over HTTP
//! - [`memory::MemoryBackend`] - an in-process implementation (feature `memory`)
//! - [`repo`] - typed repositories the binaries call

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod backend;
pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod query;
pub mod repo;
pub mod supabase;

pub use auth::{AuthSession, AuthUser};
pub use backend::{AuthProvider, Caller, TableStore};
pub use error::{AuthError, StoreError};
pub use query::{Direction, Filter, Select, Table};
pub use repo::{ContactInfoRepository, ProductRepository, SiteContentRepository, UserRoleRepository};
pub use supabase::{SupabaseClient, SupabaseConfig};
