//! Fixtures shared by the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use shared::{
    ActivityFeed, AdminBoard, CustomerRecord, LinkedUser, OwnerBooking, PaymentStatus,
    ProviderFields, ProviderId, ProviderRecord, ReservationId, ReservationRecord, SessionContext,
    UserRole, Visit, VisitId,
};
use uuid::Uuid;
use wm_backend::store::{MarketplaceStore, MemoryStore};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn admin() -> SessionContext {
    SessionContext::new(Uuid::new_v4(), UserRole::Admin)
}

pub fn owner_session() -> SessionContext {
    SessionContext::new(Uuid::new_v4(), UserRole::Owner)
}

/// Provider account bound to owner row `id`
pub fn owner_of(id: ProviderId) -> SessionContext {
    owner_session().with_owner(id)
}

pub fn owner(id: ProviderId, kind: &str, fields: ProviderFields) -> ProviderRecord {
    ProviderRecord {
        owner_id: id,
        owner_type: Some(kind.to_string()),
        visible: fields.visible,
        accept: fields.accept,
        description: Some(format!("{} services", kind)),
        rate: Some(dec("4.5")),
        created_at: base_time() + Duration::minutes(id),
        user: Some(LinkedUser {
            id: Uuid::new_v4(),
            name: Some(format!("Provider {}", id)),
            email: Some(format!("provider{}@example.com", id)),
            phone: Some("0790000000".to_string()),
            city: Some("Amman".to_string()),
        }),
    }
}

pub fn customer(name: &str, verified: Option<bool>) -> CustomerRecord {
    CustomerRecord {
        id: Uuid::new_v4(),
        name: Some(name.to_string()),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        phone: None,
        city: Some("Zarqa".to_string()),
        verified,
        created_at: base_time(),
    }
}

pub fn reservation(id: ReservationId, price: &str, completed: Option<bool>) -> ReservationRecord {
    ReservationRecord {
        reservations_id: id,
        price: Some(dec(price)),
        status: completed,
        description: Some("Wedding hall booking".to_string()),
        created_at: base_time() + Duration::hours(id),
        customer_name: Some("Lina".to_string()),
        customer_email: Some("lina@example.com".to_string()),
    }
}

pub fn visit(id: VisitId, owner_id: ProviderId, day: u32, accept: Option<bool>) -> Visit {
    Visit {
        id,
        owner_id,
        visit_date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
        visit_time: Some("18:30".to_string()),
        accept,
        created_at: base_time() + Duration::minutes(id),
    }
}

pub fn booking(id: ReservationId, date: Option<(u32, u32)>, price: &str) -> OwnerBooking {
    OwnerBooking {
        id,
        reservation_date: date.and_then(|(m, d)| NaiveDate::from_ymd_opt(2025, m, d)),
        price: dec(price),
        description: "Evening reception".to_string(),
        status: PaymentStatus::Pending,
        requested_at: base_time() + Duration::hours(id),
    }
}

/// P pending (1), Q active (2), R rejected (3), H pending hall (4)
pub fn seeded_store() -> MemoryStore {
    MemoryStore::new()
        .with_provider(owner(1, "cake", ProviderFields::PENDING))
        .with_provider(owner(2, "photographer", ProviderFields::ACTIVE))
        .with_provider(owner(3, "music", ProviderFields::REJECTED))
        .with_provider(owner(4, "hall", ProviderFields::PENDING))
        .with_customer(customer("Lina", Some(true)))
        .with_customer(customer("Omar", None))
        .with_reservation(reservation(10, "1000", Some(true)))
        .with_reservation(reservation(11, "400", Some(false)))
}

pub fn dyn_store(store: &Arc<MemoryStore>) -> Arc<dyn MarketplaceStore> {
    store.clone()
}

pub fn empty_board() -> AdminBoard {
    AdminBoard::new(ActivityFeed::default())
}

/// Seeded store plus visit requests and bookings.
///
/// Hall 4 has visits 100 (June 20), 101 (June 5) and 102 (June 12, accepted)
/// and bookings 10 and 11; cake shop 1 has visit 200 and booking 12.
pub fn owner_store() -> MemoryStore {
    seeded_store()
        .with_visit(visit(100, 4, 20, None))
        .with_visit(visit(101, 4, 5, None))
        .with_visit(visit(102, 4, 12, Some(true)))
        .with_visit(visit(200, 1, 8, None))
        .with_booking(4, booking(10, Some((7, 1)), "1000"))
        .with_booking(4, booking(11, Some((9, 12)), "400"))
        .with_booking(1, booking(12, None, "150"))
}
