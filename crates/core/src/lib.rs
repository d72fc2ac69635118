//! FurnitureCo Core - Shared types library.
//!
//! This crate provides the domain types used across all FurnitureCo components:
//! - `store` - Data access against the hosted table and auth service
//! - `storefront` - Public catalog site
//! - `admin` - Content-management panel
//! - `cli` - Seeding and role management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Form assembly rules live here so both the admin handlers and
//! the tests exercise the same code.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, phone numbers and roles
//! - [`models`] - Table rows and their insert/update payloads
//! - [`messaging`] - WhatsApp hand-off links

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod messaging;
pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
pub use uuid::{self, Uuid};
