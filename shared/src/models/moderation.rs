//! Moderation transitions and pending-approval counter deltas

use serde::{Deserialize, Serialize};

use super::provider::{ProviderFields, ProviderStatus};

/// The only operations that mutate a provider's moderation state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Approve,
    Reject,
    /// Also exposed as "deactivate" on active providers
    Reset,
}

impl Transition {
    pub fn target(&self) -> ProviderStatus {
        match self {
            Transition::Approve => ProviderStatus::Active,
            Transition::Reject => ProviderStatus::Rejected,
            Transition::Reset => ProviderStatus::Pending,
        }
    }

    /// Field values persisted for this transition
    pub fn fields(&self) -> ProviderFields {
        match self {
            Transition::Approve => ProviderFields::ACTIVE,
            Transition::Reject => ProviderFields::REJECTED,
            Transition::Reset => ProviderFields::PENDING,
        }
    }

    /// Verb used in activity feed entries
    pub fn action_text(&self) -> &'static str {
        match self {
            Transition::Approve => "activated",
            Transition::Reject => "rejected",
            Transition::Reset => "set to pending",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(Transition::Approve),
            "reject" => Some(Transition::Reject),
            "reset" | "deactivate" => Some(Transition::Reset),
            _ => None,
        }
    }
}

/// Actions the dashboard offers for a provider in the given status
pub fn available_actions(status: ProviderStatus) -> &'static [Transition] {
    match status {
        ProviderStatus::Pending => &[Transition::Approve, Transition::Reject],
        ProviderStatus::Active => &[Transition::Reset],
        ProviderStatus::Rejected => &[Transition::Approve, Transition::Reset],
    }
}

/// Change to the pending-approval counter caused by a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingDelta {
    Decrement,
    Increment,
    Unchanged,
}

impl PendingDelta {
    /// Computed from the previous status, not from the target alone
    pub fn between(previous: ProviderStatus, next: ProviderStatus) -> Self {
        match (
            previous == ProviderStatus::Pending,
            next == ProviderStatus::Pending,
        ) {
            (true, false) => PendingDelta::Decrement,
            (false, true) => PendingDelta::Increment,
            _ => PendingDelta::Unchanged,
        }
    }

    /// Apply to a counter, flooring at zero
    pub fn apply(&self, count: u64) -> u64 {
        match self {
            PendingDelta::Decrement => count.saturating_sub(1),
            PendingDelta::Increment => count + 1,
            PendingDelta::Unchanged => count,
        }
    }
}
