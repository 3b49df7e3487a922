//! Domain models for the Wedding Marketplace admin platform

mod activity;
mod booking;
mod customer;
mod dashboard;
mod moderation;
mod payment;
mod provider;
mod service_detail;
mod visit;

pub use activity::*;
pub use booking::*;
pub use customer::*;
pub use dashboard::*;
pub use moderation::*;
pub use payment::*;
pub use provider::*;
pub use service_detail::*;
pub use visit::*;
