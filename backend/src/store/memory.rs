//! In-memory store
//!
//! Keeps rows in process memory. Used for local demos (`store.backend =
//! "memory"`) and by the test suite, which can switch reads or writes
//! offline to simulate network failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use shared::{
    sort_bookings, sort_visits, CustomerRecord, OwnerBooking, ProfileUpdate, ProviderFields,
    ProviderId, ProviderRecord, ReservationId, ReservationRecord, ServiceCategory, ServiceDetail,
    Visit, VisitId,
};
use uuid::Uuid;

use super::{BookingStore, OwnerStore, ProviderStore, StoreError};

#[derive(Default)]
struct Tables {
    owners: Vec<ProviderRecord>,
    details: HashMap<ProviderId, ServiceDetail>,
    customers: Vec<CustomerRecord>,
    reservations: Vec<ReservationRecord>,
    visits: Vec<Visit>,
    bookings: Vec<(ProviderId, OwnerBooking)>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    reads_offline: AtomicBool,
    writes_offline: AtomicBool,
    details_offline: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(self, record: ProviderRecord) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.owners.push(record);
        }
        self
    }

    pub fn with_detail(self, id: ProviderId, detail: ServiceDetail) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.details.insert(id, detail);
        }
        self
    }

    pub fn with_customer(self, record: CustomerRecord) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.customers.push(record);
        }
        self
    }

    pub fn with_reservation(self, record: ReservationRecord) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.reservations.push(record);
        }
        self
    }

    pub fn with_visit(self, visit: Visit) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.visits.push(visit);
        }
        self
    }

    /// Reservation made with the given provider
    pub fn with_booking(self, owner_id: ProviderId, booking: OwnerBooking) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables.bookings.push((owner_id, booking));
        }
        self
    }

    /// Make every read fail as if the network were down
    pub fn set_reads_offline(&self, offline: bool) {
        self.reads_offline.store(offline, Ordering::SeqCst);
    }

    /// Make every write fail as if the network were down
    pub fn set_writes_offline(&self, offline: bool) {
        self.writes_offline.store(offline, Ordering::SeqCst);
    }

    /// Make only category detail reads fail
    pub fn set_details_offline(&self, offline: bool) {
        self.details_offline.store(offline, Ordering::SeqCst);
    }

    /// Number of writes that reached the tables
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Stored owner row, user included
    pub fn provider_record(&self, id: ProviderId) -> Option<ProviderRecord> {
        let tables = self.tables.lock().ok()?;
        tables.owners.iter().find(|o| o.owner_id == id).cloned()
    }

    /// Stored moderation fields of one owner
    pub fn provider_fields(&self, id: ProviderId) -> Option<ProviderFields> {
        let tables = self.tables.lock().ok()?;
        tables
            .owners
            .iter()
            .find(|o| o.owner_id == id)
            .map(ProviderRecord::fields)
    }

    fn read(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if self.reads_offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("network unreachable".to_string()));
        }
        self.lock()
    }

    fn write(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if self.writes_offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("network unreachable".to_string()));
        }
        let guard = self.lock()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(guard)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl ProviderStore for MemoryStore {
    async fn fetch_providers(&self) -> Result<Vec<ProviderRecord>, StoreError> {
        let mut owners = self.read()?.owners.clone();
        owners.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owners)
    }

    async fn fetch_provider(&self, id: ProviderId) -> Result<Option<ProviderRecord>, StoreError> {
        let tables = self.read()?;
        Ok(tables.owners.iter().find(|o| o.owner_id == id).cloned())
    }

    async fn fetch_service_detail(
        &self,
        id: ProviderId,
        category: ServiceCategory,
    ) -> Result<Option<ServiceDetail>, StoreError> {
        if self.details_offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("detail table unreachable".to_string()));
        }
        let tables = self.read()?;
        Ok(tables
            .details
            .get(&id)
            .filter(|detail| detail.category() == category)
            .cloned())
    }

    async fn update_provider_fields(
        &self,
        id: ProviderId,
        fields: ProviderFields,
    ) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let owner = tables
            .owners
            .iter_mut()
            .find(|o| o.owner_id == id)
            .ok_or_else(|| StoreError::RowNotFound {
                table: "owners",
                id: id.to_string(),
            })?;
        owner.visible = fields.visible;
        owner.accept = fields.accept;
        Ok(())
    }

    async fn delete_provider(&self, id: ProviderId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let before = tables.owners.len();
        tables.owners.retain(|o| o.owner_id != id);
        if tables.owners.len() == before {
            return Err(StoreError::RowNotFound {
                table: "owners",
                id: id.to_string(),
            });
        }
        tables.details.remove(&id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>, StoreError> {
        let mut customers = self.read()?.customers.clone();
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(customers)
    }

    async fn fetch_reservations(&self) -> Result<Vec<ReservationRecord>, StoreError> {
        let mut reservations = self.read()?.reservations.clone();
        reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reservations)
    }

    async fn update_customer_verified(&self, id: Uuid, verified: bool) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let customer = tables
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::RowNotFound {
                table: "users",
                id: id.to_string(),
            })?;
        customer.verified = Some(verified);
        Ok(())
    }

    async fn update_reservation_status(
        &self,
        id: ReservationId,
        completed: bool,
    ) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let reservation = tables
            .reservations
            .iter_mut()
            .find(|r| r.reservations_id == id)
            .ok_or_else(|| StoreError::RowNotFound {
                table: "reservations",
                id: id.to_string(),
            })?;
        reservation.status = Some(completed);
        Ok(())
    }
}

#[async_trait]
impl OwnerStore for MemoryStore {
    async fn fetch_visits(&self, owner_id: ProviderId) -> Result<Vec<Visit>, StoreError> {
        let mut visits: Vec<Visit> = self
            .read()?
            .visits
            .iter()
            .filter(|v| v.owner_id == owner_id)
            .cloned()
            .collect();
        sort_visits(&mut visits);
        Ok(visits)
    }

    async fn accept_visit(
        &self,
        owner_id: ProviderId,
        visit_id: VisitId,
    ) -> Result<Visit, StoreError> {
        let mut tables = self.write()?;
        let visit = tables
            .visits
            .iter_mut()
            .find(|v| v.id == visit_id && v.owner_id == owner_id)
            .ok_or_else(|| StoreError::RowNotFound {
                table: "visit",
                id: visit_id.to_string(),
            })?;
        visit.accept = Some(true);
        Ok(visit.clone())
    }

    async fn fetch_owner_bookings(
        &self,
        owner_id: ProviderId,
    ) -> Result<Vec<OwnerBooking>, StoreError> {
        let mut bookings: Vec<OwnerBooking> = self
            .read()?
            .bookings
            .iter()
            .filter(|(owner, _)| *owner == owner_id)
            .map(|(_, booking)| booking.clone())
            .collect();
        sort_bookings(&mut bookings);
        Ok(bookings)
    }

    async fn update_profile(
        &self,
        owner_id: ProviderId,
        update: &ProfileUpdate,
    ) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let owner = tables
            .owners
            .iter_mut()
            .find(|o| o.owner_id == owner_id)
            .ok_or_else(|| StoreError::RowNotFound {
                table: "owners",
                id: owner_id.to_string(),
            })?;

        if update.touches_user() && owner.user.is_none() {
            return Err(StoreError::RowNotFound {
                table: "users",
                id: owner_id.to_string(),
            });
        }

        if let Some(description) = &update.description {
            owner.description = Some(description.clone());
        }
        if let Some(user) = owner.user.as_mut() {
            if let Some(name) = &update.name {
                user.name = Some(name.clone());
            }
            if let Some(phone) = &update.phone {
                user.phone = Some(phone.clone());
            }
            if let Some(city) = &update.city {
                user.city = Some(city.clone());
            }
        }
        Ok(())
    }
}
