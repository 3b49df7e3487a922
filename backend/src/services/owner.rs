//! Provider self-service: profile, venue visit requests and reservations
//!
//! Every call is scoped to the owner row named in the caller's session.
//! Moderation fields are never written from here.

use std::sync::Arc;

use shared::{
    OwnerBooking, ProfileUpdate, ProviderId, ServiceProvider, SessionContext, Visit, VisitId,
};

use crate::error::{AppError, AppResult};
use crate::store::{MarketplaceStore, StoreError};

#[derive(Clone)]
pub struct OwnerService {
    store: Arc<dyn MarketplaceStore>,
}

impl OwnerService {
    pub fn new(store: Arc<dyn MarketplaceStore>) -> Self {
        Self { store }
    }

    /// The caller's own provider record with its category detail
    pub async fn profile(&self, ctx: &SessionContext) -> AppResult<ServiceProvider> {
        let owner_id = require_owner(ctx)?;

        let record = self
            .store
            .fetch_provider(owner_id)
            .await
            .map_err(AppError::FetchFailure)?
            .ok_or_else(|| AppError::NotFound(format!("Service provider {}", owner_id)))?;

        let detail = match record.category() {
            Some(category) => self
                .store
                .fetch_service_detail(owner_id, category)
                .await
                .map_err(AppError::FetchFailure)?,
            None => None,
        };

        Ok(ServiceProvider::from_record(record, detail))
    }

    /// Edit contact fields and description, then return the stored profile
    pub async fn update_profile(
        &self,
        ctx: &SessionContext,
        update: &ProfileUpdate,
    ) -> AppResult<ServiceProvider> {
        let owner_id = require_owner(ctx)?;

        if update.is_empty() {
            return Err(AppError::validation("profile", "No fields to update"));
        }
        if let Some(field) = update.blank_field() {
            return Err(AppError::validation(field, "Must not be blank"));
        }

        self.store
            .update_profile(owner_id, update)
            .await
            .map_err(|e| write_error(e, format!("Service provider {}", owner_id)))?;

        tracing::info!(owner_id, user_id = %ctx.user_id, "Provider profile updated");
        self.profile(ctx).await
    }

    /// Visit requests for the caller's venue, earliest date first
    pub async fn visits(&self, ctx: &SessionContext) -> AppResult<Vec<Visit>> {
        let owner_id = require_owner(ctx)?;
        self.store
            .fetch_visits(owner_id)
            .await
            .map_err(AppError::FetchFailure)
    }

    /// Accept a visit request; accepting twice is harmless
    pub async fn accept_visit(&self, ctx: &SessionContext, visit_id: VisitId) -> AppResult<Visit> {
        let owner_id = require_owner(ctx)?;

        let visit = self
            .store
            .accept_visit(owner_id, visit_id)
            .await
            .map_err(|e| {
                tracing::warn!(owner_id, visit_id, "Visit accept failed: {}", e);
                write_error(e, format!("Visit {}", visit_id))
            })?;

        tracing::info!(owner_id, visit_id, date = %visit.visit_date, "Visit accepted");
        Ok(visit)
    }

    /// Reservations made with the caller, latest reservation date first
    pub async fn bookings(&self, ctx: &SessionContext) -> AppResult<Vec<OwnerBooking>> {
        let owner_id = require_owner(ctx)?;
        self.store
            .fetch_owner_bookings(owner_id)
            .await
            .map_err(AppError::FetchFailure)
    }
}

/// Owner accounts may only act on the owner row bound to their session
pub fn require_owner(ctx: &SessionContext) -> AppResult<ProviderId> {
    ctx.managed_provider()
        .ok_or(AppError::InsufficientPermissions)
}

fn write_error(e: StoreError, what: String) -> AppError {
    match e {
        StoreError::RowNotFound { .. } => AppError::NotFound(what),
        other => AppError::UpdateFailure(other),
    }
}
