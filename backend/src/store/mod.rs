//! Persistence adapters for the hosted marketplace database
//!
//! The dashboard only talks to the store through these traits, so the
//! moderation engine can run against Postgres, the REST gateway, or the
//! in-memory store used in tests.

use async_trait::async_trait;
use shared::{
    CustomerRecord, OwnerBooking, ProfileUpdate, ProviderFields, ProviderId, ProviderRecord,
    ReservationId, ReservationRecord, ServiceCategory, ServiceDetail, Visit, VisitId,
};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;
pub mod rest;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use rest::RestStore;

/// Failure reported by a store adapter
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("gateway responded {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("malformed row: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no {table} row with id {id}")]
    RowNotFound { table: &'static str, id: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Owner rows and their category detail records
#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// All owners joined with their user, newest first
    async fn fetch_providers(&self) -> Result<Vec<ProviderRecord>, StoreError>;

    /// One owner joined with its user; `Ok(None)` once the row is gone
    async fn fetch_provider(&self, id: ProviderId) -> Result<Option<ProviderRecord>, StoreError>;

    /// Detail row for one owner; `Ok(None)` when the owner has none yet
    async fn fetch_service_detail(
        &self,
        id: ProviderId,
        category: ServiceCategory,
    ) -> Result<Option<ServiceDetail>, StoreError>;

    /// Partial update of `visible` and `accept`, scoped by owner id
    async fn update_provider_fields(
        &self,
        id: ProviderId,
        fields: ProviderFields,
    ) -> Result<(), StoreError>;

    async fn delete_provider(&self, id: ProviderId) -> Result<(), StoreError>;

    /// Cheap reachability check for the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Customer accounts and reservations
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Users with role `user`, newest first
    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>, StoreError>;

    /// Reservations joined with their customer, newest first
    async fn fetch_reservations(&self) -> Result<Vec<ReservationRecord>, StoreError>;

    async fn update_customer_verified(&self, id: Uuid, verified: bool) -> Result<(), StoreError>;

    async fn update_reservation_status(
        &self,
        id: ReservationId,
        completed: bool,
    ) -> Result<(), StoreError>;
}

/// Rows a provider manages from their own page.
///
/// Every method is scoped by the owner id, so one provider can never touch
/// another provider's rows.
#[async_trait]
pub trait OwnerStore: Send + Sync {
    async fn fetch_visits(&self, owner_id: ProviderId) -> Result<Vec<Visit>, StoreError>;

    /// Set `accept = true`; `RowNotFound` unless the visit belongs to the owner
    async fn accept_visit(&self, owner_id: ProviderId, visit_id: VisitId)
        -> Result<Visit, StoreError>;

    async fn fetch_owner_bookings(
        &self,
        owner_id: ProviderId,
    ) -> Result<Vec<OwnerBooking>, StoreError>;

    /// Write the provided profile fields; absent fields keep their value
    async fn update_profile(
        &self,
        owner_id: ProviderId,
        update: &ProfileUpdate,
    ) -> Result<(), StoreError>;
}

/// Everything the server needs from the store
pub trait MarketplaceStore: ProviderStore + BookingStore + OwnerStore {}

impl<T: ProviderStore + BookingStore + OwnerStore> MarketplaceStore for T {}
