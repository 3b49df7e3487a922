//! Admin dashboard loading, detail views, customers and payments

use std::sync::Arc;

use shared::{
    ActivityKind, AdminBoard, Customer, CustomerStatus, Payment, PaymentStatus, ProviderId,
    ProviderRecord, ReservationId, ServiceProvider, SessionContext,
};
use uuid::Uuid;

use super::moderation::require_admin;
use crate::error::{AppError, AppResult};
use crate::store::MarketplaceStore;

/// Dashboard service for the admin overview
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn MarketplaceStore>,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    /// Reload every list and recompute statistics from scratch.
    ///
    /// On failure the previously loaded rows stay on the board.
    pub async fn load(&self, ctx: &SessionContext, board: &mut AdminBoard) -> AppResult<()> {
        require_admin(ctx)?;

        let fetched = tokio::try_join!(
            self.store.fetch_providers(),
            self.store.fetch_customers(),
            self.store.fetch_reservations(),
        );

        let (owners, customers, reservations) = match fetched {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Dashboard fetch failed: {}", e);
                board.activity.record_failure("Error fetching data");
                return Err(AppError::FetchFailure(e));
            }
        };

        let mut providers = Vec::with_capacity(owners.len());
        for owner in owners {
            providers.push(self.with_service_detail(owner).await);
        }

        let customers = customers.into_iter().map(Customer::from).collect();
        let payments = reservations.into_iter().map(Payment::from).collect();

        board.replace(providers, customers, payments);
        board
            .activity
            .record(ActivityKind::Success, "Data updated successfully");

        tracing::debug!(
            providers = board.providers().len(),
            pending = board.stats().pending_approvals,
            "Dashboard loaded"
        );
        Ok(())
    }

    /// Re-read the provider list so it reflects other sessions' changes.
    ///
    /// Only providers that are new on this board, or changed category, get
    /// their service detail fetched; the others keep the one already loaded.
    pub async fn refresh_providers(
        &self,
        ctx: &SessionContext,
        board: &mut AdminBoard,
    ) -> AppResult<()> {
        require_admin(ctx)?;

        let owners = match self.store.fetch_providers().await {
            Ok(owners) => owners,
            Err(e) => {
                tracing::warn!("Provider list fetch failed: {}", e);
                board.activity.record_failure("Error fetching data");
                return Err(AppError::FetchFailure(e));
            }
        };

        let mut providers = Vec::with_capacity(owners.len());
        for owner in owners {
            let known = board
                .provider(owner.owner_id)
                .map_or(false, |p| p.category() == owner.category());
            providers.push(if known {
                ServiceProvider::from_record(owner, None)
            } else {
                self.with_service_detail(owner).await
            });
        }

        board.refresh_providers(providers);
        Ok(())
    }

    /// Overwrite the board's copy of one provider with the stored row.
    ///
    /// A provider deleted elsewhere is dropped from the board and reported
    /// as not found.
    pub async fn sync_provider<'b>(
        &self,
        board: &'b mut AdminBoard,
        id: ProviderId,
    ) -> AppResult<&'b ServiceProvider> {
        match self.store.fetch_provider(id).await {
            Ok(Some(record)) => Ok(board.sync_provider(ServiceProvider::from_record(record, None))),
            Ok(None) => {
                if board.remove_provider(id).is_some() {
                    tracing::debug!(provider_id = id, "Provider gone from store");
                }
                Err(AppError::NotFound(format!("Service provider {}", id)))
            }
            Err(e) => {
                tracing::warn!(provider_id = id, "Provider fetch failed: {}", e);
                board.activity.record_failure("Error fetching data");
                Err(AppError::FetchFailure(e))
            }
        }
    }

    /// Build a provider aggregate; a failed detail fetch is shown as "no detail"
    async fn with_service_detail(&self, owner: ProviderRecord) -> ServiceProvider {
        let detail = match owner.category() {
            Some(category) => self
                .store
                .fetch_service_detail(owner.owner_id, category)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!(
                        provider_id = owner.owner_id,
                        "Error fetching service details: {}",
                        e
                    );
                    None
                }),
            None => None,
        };
        ServiceProvider::from_record(owner, detail)
    }

    /// Re-fetch one provider and its category detail for the detail view
    pub async fn provider_detail<'b>(
        &self,
        ctx: &SessionContext,
        board: &'b mut AdminBoard,
        id: ProviderId,
    ) -> AppResult<&'b ServiceProvider> {
        require_admin(ctx)?;

        let category = self.sync_provider(board, id).await?.category();

        let detail = match category {
            Some(category) => match self.store.fetch_service_detail(id, category).await {
                Ok(detail) => detail,
                Err(e) => {
                    tracing::warn!(provider_id = id, "Error fetching service details: {}", e);
                    board
                        .activity
                        .record_failure("Error fetching service details");
                    return Err(AppError::FetchFailure(e));
                }
            },
            None => None,
        };

        board
            .set_service_detail(id, detail)
            .ok_or_else(|| AppError::NotFound(format!("Service provider {}", id)))
    }

    /// Verify or suspend a customer account
    pub async fn set_customer_status<'b>(
        &self,
        ctx: &SessionContext,
        board: &'b mut AdminBoard,
        id: Uuid,
        status: CustomerStatus,
    ) -> AppResult<&'b Customer> {
        require_admin(ctx)?;

        let name = board
            .customer(id)
            .map(|c| c.name.clone())
            .ok_or_else(|| AppError::NotFound(format!("Customer {}", id)))?;

        if let Err(e) = self
            .store
            .update_customer_verified(id, status.is_verified())
            .await
        {
            tracing::warn!(customer_id = %id, "Customer update failed: {}", e);
            board.activity.record_failure("Error updating customer status");
            return Err(AppError::UpdateFailure(e));
        }

        let (kind, verb) = if status.is_verified() {
            (ActivityKind::Success, "Activated")
        } else {
            (ActivityKind::Warning, "Suspended")
        };
        board
            .activity
            .record(kind, format!("{} customer: {}", verb, name));

        board
            .set_customer_status(id, status)
            .ok_or_else(|| AppError::NotFound(format!("Customer {}", id)))
    }

    /// Mark a reservation payment completed or pending
    pub async fn set_payment_status<'b>(
        &self,
        ctx: &SessionContext,
        board: &'b mut AdminBoard,
        id: ReservationId,
        status: PaymentStatus,
    ) -> AppResult<&'b Payment> {
        require_admin(ctx)?;

        if board.payment(id).is_none() {
            return Err(AppError::NotFound(format!("Payment {}", id)));
        }

        if let Err(e) = self
            .store
            .update_reservation_status(id, status.as_flag())
            .await
        {
            tracing::warn!(reservation_id = id, "Payment update failed: {}", e);
            board.activity.record_failure("Error updating payment status");
            return Err(AppError::UpdateFailure(e));
        }

        let (kind, verb) = match status {
            PaymentStatus::Completed => (ActivityKind::Success, "Completed"),
            PaymentStatus::Pending => (ActivityKind::Warning, "Suspended"),
        };
        board
            .activity
            .record(kind, format!("{} payment #{}", verb, id));

        board
            .set_payment_status(id, status)
            .ok_or_else(|| AppError::NotFound(format!("Payment {}", id)))
    }
}
