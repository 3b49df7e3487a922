//! HTTP handlers

pub mod admin;
pub mod health;
pub mod owner;

pub use admin::*;
pub use health::health_check;
