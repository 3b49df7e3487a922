//! Common types used across the platform

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Owner row identifier
pub type ProviderId = i64;

/// Reservation row identifier
pub type ReservationId = i64;

/// Visit request row identifier
pub type VisitId = i64;

/// Placeholder shown for missing contact fields
pub const NOT_AVAILABLE: &str = "N/A";

/// Account roles known to the platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Owner,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Owner => "owner",
            UserRole::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "owner" => Some(UserRole::Owner),
            "user" => Some(UserRole::User),
            _ => None,
        }
    }
}

/// Identity of the caller performing an operation.
///
/// Passed explicitly into every service call instead of being read from
/// ambient session storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub role: UserRole,
    /// Owner row managed by this user, present for provider accounts
    pub owner_id: Option<ProviderId>,
}

impl SessionContext {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            owner_id: None,
        }
    }

    pub fn with_owner(mut self, owner_id: ProviderId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Owner row this session may manage; only owner accounts have one
    pub fn managed_provider(&self) -> Option<ProviderId> {
        match self.role {
            UserRole::Owner => self.owner_id,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_round_trip() {
        for role in [UserRole::Admin, UserRole::Owner, UserRole::User] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("superuser"), None);
    }

    #[test]
    fn test_only_admin_context_is_admin() {
        let id = Uuid::new_v4();
        assert!(SessionContext::new(id, UserRole::Admin).is_admin());
        assert!(!SessionContext::new(id, UserRole::Owner).is_admin());
    }

    #[test]
    fn test_managed_provider_requires_owner_role() {
        let id = Uuid::new_v4();
        let owner = SessionContext::new(id, UserRole::Owner).with_owner(12);
        assert_eq!(owner.managed_provider(), Some(12));

        assert_eq!(SessionContext::new(id, UserRole::Owner).managed_provider(), None);
        let admin = SessionContext::new(id, UserRole::Admin).with_owner(12);
        assert_eq!(admin.managed_provider(), None);
    }
}
