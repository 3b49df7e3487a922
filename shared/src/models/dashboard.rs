//! Admin dashboard view state: loaded rows plus derived statistics
//!
//! `AdminBoard` is only ever mutated after the corresponding write has been
//! persisted, so a failed write leaves it untouched.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::activity::ActivityFeed;
use super::customer::{Customer, CustomerStatus};
use super::moderation::{PendingDelta, Transition};
use super::payment::{Payment, PaymentStatus};
use super::provider::{ProviderStatus, ServiceProvider};
use super::service_detail::{ServiceCategory, ServiceDetail};
use crate::types::{ProviderId, ReservationId};

/// Aggregate counters shown on the overview tab
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_venues: u64,
    pub total_customers: u64,
    pub pending_approvals: u64,
    pub total_revenue: Decimal,
    pub active_bookings: u64,
    pub total_service_providers: u64,
    pub pending_payments: Decimal,
}

impl DashboardStats {
    /// Recompute every counter from freshly loaded rows
    pub fn compute(
        providers: &[ServiceProvider],
        customers: &[Customer],
        payments: &[Payment],
    ) -> Self {
        let count = |n: usize| n as u64;

        Self {
            total_venues: count(
                providers
                    .iter()
                    .filter(|p| p.category() == Some(ServiceCategory::Hall))
                    .count(),
            ),
            total_customers: count(customers.len()),
            pending_approvals: count(
                providers
                    .iter()
                    .filter(|p| p.status() == ProviderStatus::Pending)
                    .count(),
            ),
            total_revenue: payments.iter().map(|p| p.amount).sum(),
            active_bookings: count(
                payments
                    .iter()
                    .filter(|p| p.status == PaymentStatus::Completed)
                    .count(),
            ),
            total_service_providers: count(providers.len()),
            pending_payments: payments
                .iter()
                .filter(|p| p.status == PaymentStatus::Pending)
                .map(|p| p.amount)
                .sum(),
        }
    }
}

/// Number of providers in each moderation status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub active: u64,
    pub pending: u64,
    pub rejected: u64,
}

impl StatusCounts {
    pub fn tally<'a>(providers: impl IntoIterator<Item = &'a ServiceProvider>) -> Self {
        providers
            .into_iter()
            .fold(Self::default(), |mut counts, p| {
                match p.status() {
                    ProviderStatus::Active => counts.active += 1,
                    ProviderStatus::Pending => counts.pending += 1,
                    ProviderStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }
}

/// Provider list filter used by the service-provider tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ProviderStatus),
}

impl StatusFilter {
    pub fn matches(&self, provider: &ServiceProvider) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => provider.status() == *status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") || s.is_empty() {
            return Ok(StatusFilter::All);
        }
        s.parse::<ProviderStatus>().map(StatusFilter::Only)
    }
}

/// What a transition did to the in-memory board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub previous: ProviderStatus,
    pub current: ProviderStatus,
    pub pending_delta: PendingDelta,
}

/// Loaded dashboard state for one admin session
#[derive(Debug, Clone, Default)]
pub struct AdminBoard {
    providers: Vec<ServiceProvider>,
    customers: Vec<Customer>,
    payments: Vec<Payment>,
    stats: DashboardStats,
    pub activity: ActivityFeed,
    loaded: bool,
}

impl AdminBoard {
    pub fn new(activity: ActivityFeed) -> Self {
        Self {
            activity,
            ..Self::default()
        }
    }

    /// Replace all rows and recompute statistics from scratch
    pub fn replace(
        &mut self,
        providers: Vec<ServiceProvider>,
        customers: Vec<Customer>,
        payments: Vec<Payment>,
    ) {
        self.stats = DashboardStats::compute(&providers, &customers, &payments);
        self.providers = providers;
        self.customers = customers;
        self.payments = payments;
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.providers)
    }

    pub fn providers(&self) -> &[ServiceProvider] {
        &self.providers
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn provider(&self, id: ProviderId) -> Option<&ServiceProvider> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn customer(&self, id: Uuid) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn payment(&self, id: ReservationId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    pub fn filter_providers(&self, filter: StatusFilter) -> Vec<&ServiceProvider> {
        self.providers.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Mirror a persisted transition and patch the pending counter.
    ///
    /// The counter delta is computed from the provider's previous status.
    pub fn apply_transition(
        &mut self,
        id: ProviderId,
        transition: Transition,
    ) -> Option<TransitionOutcome> {
        let provider = self.providers.iter_mut().find(|p| p.id == id)?;
        let previous = provider.status();
        provider.apply_fields(transition.fields());
        let current = provider.status();

        let pending_delta = PendingDelta::between(previous, current);
        self.stats.pending_approvals = pending_delta.apply(self.stats.pending_approvals);

        Some(TransitionOutcome {
            previous,
            current,
            pending_delta,
        })
    }

    /// Drop a deleted provider and patch the counters
    pub fn remove_provider(&mut self, id: ProviderId) -> Option<ServiceProvider> {
        let index = self.providers.iter().position(|p| p.id == id)?;
        let removed = self.providers.remove(index);

        if removed.status() == ProviderStatus::Pending {
            self.stats.pending_approvals = self.stats.pending_approvals.saturating_sub(1);
        }
        if removed.category() == Some(ServiceCategory::Hall) {
            self.stats.total_venues = self.stats.total_venues.saturating_sub(1);
        }
        self.stats.total_service_providers = self.stats.total_service_providers.saturating_sub(1);

        Some(removed)
    }

    /// Replace the provider list with freshly read rows.
    ///
    /// Service details already fetched are kept for providers whose category
    /// did not change.
    pub fn refresh_providers(&mut self, providers: Vec<ServiceProvider>) {
        let mut previous = std::mem::take(&mut self.providers);
        self.providers = providers
            .into_iter()
            .map(|mut fresh| {
                if let Some(old) = previous.iter_mut().find(|p| p.id == fresh.id) {
                    carry_detail(old, &mut fresh);
                }
                fresh
            })
            .collect();
        self.recount_providers();
    }

    /// Insert or overwrite one provider with the stored row
    pub fn sync_provider(&mut self, mut fresh: ServiceProvider) -> &ServiceProvider {
        let index = match self.providers.iter().position(|p| p.id == fresh.id) {
            Some(index) => {
                carry_detail(&mut self.providers[index], &mut fresh);
                self.providers[index] = fresh;
                index
            }
            None => {
                self.providers.push(fresh);
                self.providers.len() - 1
            }
        };
        self.recount_providers();
        &self.providers[index]
    }

    fn recount_providers(&mut self) {
        let counts = DashboardStats::compute(&self.providers, &[], &[]);
        self.stats.total_venues = counts.total_venues;
        self.stats.pending_approvals = counts.pending_approvals;
        self.stats.total_service_providers = counts.total_service_providers;
    }

    /// Refresh the service detail of one loaded provider
    pub fn set_service_detail(
        &mut self,
        id: ProviderId,
        detail: Option<ServiceDetail>,
    ) -> Option<&ServiceProvider> {
        let provider = self.providers.iter_mut().find(|p| p.id == id)?;
        provider.service = detail;
        Some(provider)
    }

    pub fn set_customer_status(&mut self, id: Uuid, status: CustomerStatus) -> Option<&Customer> {
        let customer = self.customers.iter_mut().find(|c| c.id == id)?;
        customer.verified = status.is_verified();
        Some(customer)
    }

    /// Mirror a persisted payment status; counters move only on a real change
    pub fn set_payment_status(
        &mut self,
        id: ReservationId,
        status: PaymentStatus,
    ) -> Option<&Payment> {
        let index = self.payments.iter().position(|p| p.id == id)?;
        let previous = self.payments[index].status;
        let amount = self.payments[index].amount;
        self.payments[index].status = status;

        if previous != status {
            let stats = &mut self.stats;
            match status {
                PaymentStatus::Completed => {
                    stats.active_bookings += 1;
                    stats.pending_payments = (stats.pending_payments - amount).max(Decimal::ZERO);
                }
                PaymentStatus::Pending => {
                    stats.active_bookings = stats.active_bookings.saturating_sub(1);
                    stats.pending_payments += amount;
                }
            }
        }

        self.payments.get(index)
    }
}

fn carry_detail(old: &mut ServiceProvider, fresh: &mut ServiceProvider) {
    if fresh.service.is_none() && old.category() == fresh.category() {
        fresh.service = old.service.take();
    }
}
