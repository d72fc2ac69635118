//! Session-held types for the admin panel.

pub mod flash;
pub mod session;

pub use flash::{Flash, FlashKind};
pub use session::{CurrentAdmin, keys as session_keys};
