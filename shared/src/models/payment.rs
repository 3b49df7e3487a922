//! Reservation payments and the platform commission split

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ReservationId;

/// Platform share of every reservation amount (15%)
pub const COMMISSION_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Default payment method shown for reservations
pub const DEFAULT_PAYMENT_METHOD: &str = "Credit Card";

/// Payment settlement status, stored as `reservations.status`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Completed,
    Pending,
}

impl PaymentStatus {
    pub fn from_flag(status: Option<bool>) -> Self {
        if status == Some(true) {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Pending
        }
    }

    pub fn as_flag(&self) -> bool {
        *self == PaymentStatus::Completed
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Completed" | "completed" => Ok(PaymentStatus::Completed),
            "Pending" | "pending" => Ok(PaymentStatus::Pending),
            other => Err(format!("unknown payment status: {}", other)),
        }
    }
}

/// Commission and net amount for a gross amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommissionSplit {
    pub commission: Decimal,
    pub net_amount: Decimal,
}

impl CommissionSplit {
    pub fn of(amount: Decimal) -> Self {
        let commission = amount * COMMISSION_RATE;
        Self {
            commission,
            net_amount: amount - commission,
        }
    }
}

/// Reservation row joined with its customer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationRecord {
    pub reservations_id: ReservationId,
    pub price: Option<Decimal>,
    pub status: Option<bool>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
}

/// Payment row shown on the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: ReservationId,
    pub booking: ReservationId,
    pub customer: String,
    pub amount: Decimal,
    pub commission: Decimal,
    pub net_amount: Decimal,
    pub date: DateTime<Utc>,
    pub status: PaymentStatus,
    pub method: String,
    pub description: String,
}

impl From<ReservationRecord> for Payment {
    fn from(record: ReservationRecord) -> Self {
        let amount = record.price.unwrap_or(Decimal::ZERO);
        let split = CommissionSplit::of(amount);

        Self {
            id: record.reservations_id,
            booking: record.reservations_id,
            customer: record
                .customer_name
                .unwrap_or_else(|| "Unknown".to_string()),
            amount,
            commission: split.commission,
            net_amount: split.net_amount,
            date: record.created_at,
            status: PaymentStatus::from_flag(record.status),
            method: DEFAULT_PAYMENT_METHOD.to_string(),
            description: record.description.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn reservation(price: Option<Decimal>, status: Option<bool>) -> ReservationRecord {
        ReservationRecord {
            reservations_id: 41,
            price,
            status,
            description: None,
            created_at: Utc::now(),
            customer_name: None,
            customer_email: None,
        }
    }

    #[test]
    fn test_commission_split_is_15_85() {
        let split = CommissionSplit::of(dec("1000"));
        assert_eq!(split.commission, dec("150"));
        assert_eq!(split.net_amount, dec("850"));
    }

    #[test]
    fn test_commission_split_keeps_cents_exact() {
        let split = CommissionSplit::of(dec("99.99"));
        assert_eq!(split.commission + split.net_amount, dec("99.99"));
        assert_eq!(split.commission, dec("14.9985"));
    }

    #[test]
    fn test_payment_from_reservation_defaults() {
        let payment = Payment::from(reservation(None, None));
        assert_eq!(payment.amount, Decimal::ZERO);
        assert_eq!(payment.commission, Decimal::ZERO);
        assert_eq!(payment.customer, "Unknown");
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.method, DEFAULT_PAYMENT_METHOD);
        assert_eq!(payment.booking, payment.id);
    }

    #[test]
    fn test_payment_status_from_flag() {
        assert_eq!(PaymentStatus::from_flag(Some(true)), PaymentStatus::Completed);
        assert_eq!(PaymentStatus::from_flag(Some(false)), PaymentStatus::Pending);
        let payment = Payment::from(reservation(Some(dec("200")), Some(true)));
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.net_amount, dec("170"));
    }
}
