//! Service provider (owner) models and status derivation

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::service_detail::{ServiceCategory, ServiceDetail};
use crate::types::{ProviderId, NOT_AVAILABLE};

/// Moderation status of a provider, derived from `visible` and `accept`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProviderStatus {
    Active,
    Pending,
    Rejected,
}

impl ProviderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderStatus::Active => "Active",
            ProviderStatus::Pending => "Pending",
            ProviderStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" | "active" => Ok(ProviderStatus::Active),
            "Pending" | "pending" => Ok(ProviderStatus::Pending),
            "Rejected" | "rejected" => Ok(ProviderStatus::Rejected),
            other => Err(format!("unknown provider status: {}", other)),
        }
    }
}

/// Derive the moderation status from the two persisted owner columns.
///
/// The Active pattern is checked first, then Rejected; every other
/// combination, including ones no transition produces, falls back to Pending.
pub fn derive_status(visible: bool, accept: Option<bool>) -> ProviderStatus {
    match (visible, accept) {
        (true, Some(true)) => ProviderStatus::Active,
        (false, Some(false)) => ProviderStatus::Rejected,
        _ => ProviderStatus::Pending,
    }
}

/// The two owner columns that encode moderation state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderFields {
    pub visible: bool,
    pub accept: Option<bool>,
}

impl ProviderFields {
    pub const ACTIVE: ProviderFields = ProviderFields {
        visible: true,
        accept: Some(true),
    };
    pub const REJECTED: ProviderFields = ProviderFields {
        visible: false,
        accept: Some(false),
    };
    pub const PENDING: ProviderFields = ProviderFields {
        visible: false,
        accept: None,
    };

    pub fn status(&self) -> ProviderStatus {
        derive_status(self.visible, self.accept)
    }
}

/// User account linked to an owner row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkedUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// Owner row as returned by the store, joined with its user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderRecord {
    pub owner_id: ProviderId,
    pub owner_type: Option<String>,
    pub visible: bool,
    pub accept: Option<bool>,
    pub description: Option<String>,
    pub rate: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub user: Option<LinkedUser>,
}

impl ProviderRecord {
    pub fn fields(&self) -> ProviderFields {
        ProviderFields {
            visible: self.visible,
            accept: self.accept,
        }
    }

    pub fn category(&self) -> Option<ServiceCategory> {
        self.owner_type.as_deref().and_then(ServiceCategory::parse)
    }
}

/// Provider aggregate displayed on the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceProvider {
    pub id: ProviderId,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub visible: bool,
    pub accept: Option<bool>,
    pub description: String,
    pub rate: Decimal,
    pub created_at: DateTime<Utc>,
    pub user: Option<LinkedUser>,
    pub service: Option<ServiceDetail>,
}

impl ServiceProvider {
    /// Build the display aggregate from a store row and its optional detail
    pub fn from_record(record: ProviderRecord, service: Option<ServiceDetail>) -> Self {
        let user = record.user.as_ref();

        Self {
            id: record.owner_id,
            name: user
                .and_then(|u| u.name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
            service_type: record
                .owner_type
                .clone()
                .unwrap_or_else(|| "Not specified".to_string()),
            email: or_not_available(user.and_then(|u| u.email.as_ref())),
            phone: or_not_available(user.and_then(|u| u.phone.as_ref())),
            city: or_not_available(user.and_then(|u| u.city.as_ref())),
            visible: record.visible,
            accept: record.accept,
            description: record.description.clone().unwrap_or_default(),
            rate: record.rate.unwrap_or(Decimal::ZERO),
            created_at: record.created_at,
            user: record.user,
            service,
        }
    }

    /// Current status, always recomputed from the stored pair
    pub fn status(&self) -> ProviderStatus {
        derive_status(self.visible, self.accept)
    }

    pub fn fields(&self) -> ProviderFields {
        ProviderFields {
            visible: self.visible,
            accept: self.accept,
        }
    }

    pub fn category(&self) -> Option<ServiceCategory> {
        ServiceCategory::parse(&self.service_type)
    }

    /// Mirror exactly what was persisted
    pub fn apply_fields(&mut self, fields: ProviderFields) {
        self.visible = fields.visible;
        self.accept = fields.accept;
    }
}

fn or_not_available(value: Option<&String>) -> String {
    value
        .cloned()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Profile fields a provider may edit on their own page.
///
/// Moderation columns are not part of it; only admins change those.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub description: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && !self.touches_user()
    }

    /// Whether any column of the linked `users` row changes
    pub fn touches_user(&self) -> bool {
        self.name.is_some() || self.phone.is_some() || self.city.is_some()
    }

    /// First field that is present but blank
    pub fn blank_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("city", &self.city),
        ]
        .into_iter()
        .find(|(_, value)| value.as_deref().map_or(false, |v| v.trim().is_empty()))
        .map(|(field, _)| field)
    }
}

/// Serialized form of a provider including its derived status
#[derive(Debug, Clone, Serialize)]
pub struct ProviderView<'a> {
    #[serde(flatten)]
    pub provider: &'a ServiceProvider,
    pub status: ProviderStatus,
}

impl<'a> From<&'a ServiceProvider> for ProviderView<'a> {
    fn from(provider: &'a ServiceProvider) -> Self {
        Self {
            provider,
            status: provider.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(owner_type: Option<&str>, user: Option<LinkedUser>) -> ProviderRecord {
        ProviderRecord {
            owner_id: 7,
            owner_type: owner_type.map(str::to_string),
            visible: false,
            accept: None,
            description: None,
            rate: None,
            created_at: Utc::now(),
            user,
        }
    }

    #[test]
    fn test_derive_status_all_combinations() {
        let cases = [
            (true, Some(true), ProviderStatus::Active),
            (true, Some(false), ProviderStatus::Pending),
            (true, None, ProviderStatus::Pending),
            (false, Some(true), ProviderStatus::Pending),
            (false, Some(false), ProviderStatus::Rejected),
            (false, None, ProviderStatus::Pending),
        ];
        for (visible, accept, expected) in cases {
            assert_eq!(
                derive_status(visible, accept),
                expected,
                "visible={} accept={:?}",
                visible,
                accept
            );
        }
    }

    #[test]
    fn test_canonical_field_constants() {
        assert_eq!(ProviderFields::ACTIVE.status(), ProviderStatus::Active);
        assert_eq!(ProviderFields::REJECTED.status(), ProviderStatus::Rejected);
        assert_eq!(ProviderFields::PENDING.status(), ProviderStatus::Pending);
    }

    #[test]
    fn test_from_record_fills_display_defaults() {
        let provider = ServiceProvider::from_record(record(None, None), None);
        assert_eq!(provider.name, "Unknown");
        assert_eq!(provider.service_type, "Not specified");
        assert_eq!(provider.email, NOT_AVAILABLE);
        assert_eq!(provider.city, NOT_AVAILABLE);
        assert_eq!(provider.rate, Decimal::ZERO);
        assert_eq!(provider.status(), ProviderStatus::Pending);
        assert_eq!(provider.category(), None);
    }

    #[test]
    fn test_from_record_uses_linked_user() {
        let user = LinkedUser {
            id: Uuid::new_v4(),
            name: Some("Layla".to_string()),
            email: Some("layla@example.com".to_string()),
            phone: None,
            city: Some("Amman".to_string()),
        };
        let provider = ServiceProvider::from_record(record(Some("hall"), Some(user)), None);
        assert_eq!(provider.name, "Layla");
        assert_eq!(provider.email, "layla@example.com");
        assert_eq!(provider.phone, NOT_AVAILABLE);
        assert_eq!(provider.city, "Amman");
        assert_eq!(provider.category(), Some(ServiceCategory::Hall));
    }

    #[test]
    fn test_profile_update_checks() {
        assert!(ProfileUpdate::default().is_empty());

        let update = ProfileUpdate {
            description: Some("Garden venue".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert!(!update.touches_user());
        assert_eq!(update.blank_field(), None);

        let update = ProfileUpdate {
            name: Some("  ".to_string()),
            city: Some("Irbid".to_string()),
            ..Default::default()
        };
        assert!(update.touches_user());
        assert_eq!(update.blank_field(), Some("name"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Active".parse::<ProviderStatus>(), Ok(ProviderStatus::Active));
        assert_eq!("pending".parse::<ProviderStatus>(), Ok(ProviderStatus::Pending));
        assert!("all".parse::<ProviderStatus>().is_err());
    }
}
