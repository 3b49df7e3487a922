//! Customer accounts (users with the `user` role)

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::NOT_AVAILABLE;

/// Customer account status, stored as `users.verified`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CustomerStatus {
    Active,
    Inactive,
}

impl CustomerStatus {
    pub fn from_verified(verified: bool) -> Self {
        if verified {
            CustomerStatus::Active
        } else {
            CustomerStatus::Inactive
        }
    }

    pub fn is_verified(&self) -> bool {
        *self == CustomerStatus::Active
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerStatus::Active => f.write_str("Active"),
            CustomerStatus::Inactive => f.write_str("Inactive"),
        }
    }
}

impl FromStr for CustomerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" | "active" => Ok(CustomerStatus::Active),
            "Inactive" | "inactive" => Ok(CustomerStatus::Inactive),
            other => Err(format!("unknown customer status: {}", other)),
        }
    }
}

/// User row with role `user`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRecord {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub verified: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// Customer row shown on the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub join_date: DateTime<Utc>,
    pub verified: bool,
}

impl Customer {
    pub fn status(&self) -> CustomerStatus {
        CustomerStatus::from_verified(self.verified)
    }
}

impl From<CustomerRecord> for Customer {
    fn from(record: CustomerRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            email: record.email.unwrap_or_default(),
            phone: record.phone.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            city: record.city.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            join_date: record.created_at,
            verified: record.verified.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unverified_customer_is_inactive() {
        let customer = Customer::from(CustomerRecord {
            id: Uuid::new_v4(),
            name: Some("Omar".to_string()),
            email: Some("omar@example.com".to_string()),
            phone: None,
            city: None,
            verified: None,
            created_at: Utc::now(),
        });
        assert_eq!(customer.status(), CustomerStatus::Inactive);
        assert_eq!(customer.phone, NOT_AVAILABLE);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Active".parse(), Ok(CustomerStatus::Active));
        assert!(CustomerStatus::Active.is_verified());
        assert!("Suspended".parse::<CustomerStatus>().is_err());
    }
}
