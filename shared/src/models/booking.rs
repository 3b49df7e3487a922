//! Reservations as seen by the provider they were made with

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment::PaymentStatus;
use crate::types::ReservationId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnerBooking {
    pub id: ReservationId,
    pub reservation_date: Option<NaiveDate>,
    pub price: Decimal,
    pub description: String,
    pub status: PaymentStatus,
    pub requested_at: DateTime<Utc>,
}

/// Latest reservation date first; undated requests last, newest request first
pub fn sort_bookings(bookings: &mut [OwnerBooking]) {
    bookings.sort_by(|a, b| {
        match (a.reservation_date, b.reservation_date) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then_with(|| b.requested_at.cmp(&a.requested_at))
    });
}
