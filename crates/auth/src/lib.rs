//! Session authentication for newsdesk.
//!
//! This crate provides:
//! - Username sign-in and sign-out routes
//! - Session storage (in-memory, or SQLite with the `sqlite` feature)
//! - Axum extractors for the signed-in user

mod config;
mod error;
mod extractors;
mod handlers;
mod sessions;
mod state;
mod templates;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::{AuthRejection, CurrentUser, OptionalUser};
pub use handlers::auth_routes;
pub use sessions::MemorySessionStore;
#[cfg(feature = "sqlite")]
pub use sessions::SqliteSessionStore;
pub use state::AuthState;
