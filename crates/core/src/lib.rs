//! Pure domain logic for newsdesk.
//!
//! Types, validation, filtering, pagination and permission rules live here, together
//! with the repository and cache traits implemented by the server crate. Nothing in
//! this crate performs I/O.

#[cfg(feature = "auth")]
pub mod auth;
pub mod cache;
pub mod news;
pub mod serde;
pub mod storage;
