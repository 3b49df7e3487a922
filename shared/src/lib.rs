//! Shared types and models for the Wedding Marketplace admin platform
//!
//! This crate contains the pure moderation and dashboard logic shared between
//! the backend server and the browser rendering layer (via WASM).

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
