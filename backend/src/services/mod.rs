//! Business logic services for the Wedding Marketplace platform

pub mod dashboard;
pub mod moderation;
pub mod owner;
pub mod session;

pub use dashboard::DashboardService;
pub use moderation::ModerationService;
pub use owner::OwnerService;
pub use session::SessionRegistry;
